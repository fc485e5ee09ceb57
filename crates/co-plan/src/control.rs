//! Control-input generator.
//!
//! Renders the route/vehicle document the simulator reads at start-up:
//!
//! ```xml
//! <routes xmlns:xsi="..." xsi:noNamespaceSchemaLocation="...">
//!     <vType id="car" accel="0.8" decel="4.5" sigma="0.5" length="5" minGap="2.5" maxSpeed="16.67" guiShape="passenger"/>
//!     <route id="route0" edges="E0 E12 E4 E7"/>
//!     <vehicle id="car3" type="car" route="route0" depart="0" departLane="1" departEdge="1" departPos="45.2" departSpeed="12.0"/>
//!     <vehicle id="car7" type="car" route="route2" depart="0" departPos="0.00"/>
//! </routes>
//! ```
//!
//! The document is assembled as a [`ControlDocument`] value first and
//! serialized once through `quick_xml::Writer`, which handles escaping.

use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use co_core::{Fleet, Route, RouteId, RouteRegistry, VehicleId, VehicleType};

use crate::plan::{CarryoverPlan, ResumeState};
use crate::PlanResult;

const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const ROUTES_XSD: &str = "http://sumo.dlr.de/xsd/routes_file.xsd";

/// Every vehicle departs at simulation second 0 of its run.
const DEPART: &str = "0";
/// Position of a restarting vehicle on its first edge.
const FRESH_DEPART_POS: &str = "0.00";

// ── Document model ────────────────────────────────────────────────────────────

/// One `<vehicle>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleDef {
    pub id:     VehicleId,
    pub vtype:  String,
    pub route:  RouteId,
    pub resume: Option<ResumeState>,
}

impl VehicleDef {
    /// Attributes in output order.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("id", self.id.to_string()),
            ("type", self.vtype.clone()),
            ("route", self.route.to_string()),
            ("depart", DEPART.to_owned()),
        ];
        match &self.resume {
            Some(state) => attrs.extend([
                ("departLane", state.lane.clone()),
                ("departEdge", state.edge_index.to_string()),
                ("departPos", state.pos.clone()),
                ("departSpeed", state.speed.clone()),
            ]),
            None => attrs.push(("departPos", FRESH_DEPART_POS.to_owned())),
        }
        attrs
    }
}

/// The full control input for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlDocument {
    pub vehicle_type: VehicleType,
    pub routes:       Vec<Route>,
    pub vehicles:     Vec<VehicleDef>,
}

impl ControlDocument {
    /// Serialize to an indented XML string.
    pub fn to_xml(&self) -> PlanResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("routes");
        root.push_attribute(("xmlns:xsi", XSI_NS));
        root.push_attribute(("xsi:noNamespaceSchemaLocation", ROUTES_XSD));
        writer.write_event(Event::Start(root))?;

        writer.write_event(Event::Empty(vtype_element(&self.vehicle_type)))?;

        for route in &self.routes {
            let edges = route.edges_joined();
            let mut el = BytesStart::new("route");
            el.push_attribute(("id", route.id.as_str()));
            el.push_attribute(("edges", edges.as_str()));
            writer.write_event(Event::Empty(el))?;
        }

        for vehicle in &self.vehicles {
            let mut el = BytesStart::new("vehicle");
            for (key, value) in vehicle.attributes() {
                el.push_attribute((key, value.as_str()));
            }
            writer.write_event(Event::Empty(el))?;
        }

        writer.write_event(Event::End(BytesEnd::new("routes")))?;
        let mut text = String::from_utf8(writer.into_inner())?;
        text.push('\n');
        Ok(text)
    }

    /// Serialize and write to `path`, replacing any previous file.
    pub fn write_to(&self, path: &Path) -> PlanResult<()> {
        std::fs::write(path, self.to_xml()?)?;
        Ok(())
    }
}

fn vtype_element(vt: &VehicleType) -> BytesStart<'static> {
    let mut el = BytesStart::new("vType");
    let numeric = [
        ("accel", vt.accel),
        ("decel", vt.decel),
        ("sigma", vt.sigma),
        ("length", vt.length),
        ("minGap", vt.min_gap),
        ("maxSpeed", vt.max_speed),
    ];
    el.push_attribute(("id", vt.id.as_str()));
    for (key, value) in numeric {
        el.push_attribute((key, value.to_string().as_str()));
    }
    el.push_attribute(("guiShape", vt.gui_shape.as_str()));
    el
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Build the control input from the registry and a carryover plan.
///
/// Routes follow registry order; vehicles follow plan (slot) order.
pub fn render(registry: &RouteRegistry, plan: &CarryoverPlan, vehicle_type: &VehicleType) -> ControlDocument {
    ControlDocument {
        vehicle_type: vehicle_type.clone(),
        routes:       registry.iter().cloned().collect(),
        vehicles:     plan
            .entries()
            .iter()
            .map(|entry| VehicleDef {
                id:     entry.vehicle.clone(),
                vtype:  vehicle_type.id.clone(),
                route:  entry.route.clone(),
                resume: entry.resume().cloned(),
            })
            .collect(),
    }
}

/// First-run control input: every tracked vehicle on `route`, departing at
/// position 0.  The planner is not consulted.
pub fn render_bootstrap(
    registry:     &RouteRegistry,
    fleet:        &Fleet,
    route:        &RouteId,
    vehicle_type: &VehicleType,
) -> PlanResult<(CarryoverPlan, ControlDocument)> {
    registry.require(route.as_str())?;
    let plan = CarryoverPlan::bootstrap(fleet, route);
    let doc = render(registry, &plan, vehicle_type);
    Ok((plan, doc))
}

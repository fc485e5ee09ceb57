//! Route registry.
//!
//! Routes are fixed for the lifetime of an experiment.  The registry keeps
//! them in insertion order, which is also the order they are rendered into
//! the control-input document and the order restart choices draw from.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{CoreError, CoreResult, EdgeId, RouteId};

/// One named, ordered edge sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Route {
    pub id:    RouteId,
    pub edges: Vec<EdgeId>,
}

impl Route {
    pub fn new(id: impl Into<RouteId>, edges: impl IntoIterator<Item = impl Into<EdgeId>>) -> Self {
        Self {
            id:    id.into(),
            edges: edges.into_iter().map(Into::into).collect(),
        }
    }

    /// 0-based position of `edge` in this route, first occurrence.
    pub fn edge_index(&self, edge: &str) -> Option<usize> {
        self.edges.iter().position(|e| e.as_str() == edge)
    }

    /// Edge ids joined with single spaces, as the simulator expects them.
    pub fn edges_joined(&self) -> String {
        let parts: Vec<&str> = self.edges.iter().map(EdgeId::as_str).collect();
        parts.join(" ")
    }
}

/// Immutable lookup table from route id to [`Route`].
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: Vec<Route>,
    index:  HashMap<RouteId, usize>,
    ids:    Vec<RouteId>,
}

impl RouteRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a registry, rejecting duplicate ids and empty edge lists.
    pub fn from_routes(routes: impl IntoIterator<Item = Route>) -> CoreResult<Self> {
        let mut registry = Self::empty();
        for route in routes {
            registry.insert(route)?;
        }
        Ok(registry)
    }

    fn insert(&mut self, route: Route) -> CoreResult<()> {
        if route.edges.is_empty() {
            return Err(CoreError::EmptyRoute(route.id));
        }
        if self.index.contains_key(&route.id) {
            return Err(CoreError::DuplicateRoute(route.id));
        }
        self.index.insert(route.id.clone(), self.routes.len());
        self.ids.push(route.id.clone());
        self.routes.push(route);
        Ok(())
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&Route> {
        self.index.get(id).map(|&i| &self.routes[i])
    }

    /// Like [`get`][Self::get] but fails with [`CoreError::UnknownRoute`].
    pub fn require(&self, id: &str) -> CoreResult<&Route> {
        self.get(id).ok_or_else(|| CoreError::UnknownRoute(RouteId::new(id)))
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Route ids in registry order.
    #[inline]
    pub fn ids(&self) -> &[RouteId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

//! View registration and activation.

use std::collections::{BTreeMap, HashMap};

use crate::error::{HabitudeError, HabitudeResult, HostError};
use crate::host::{LeafId, LeafPlacement, ViewState, Workspace};

use super::{View, ViewContext, ViewFactory};

/// Registered view factories and the live views they produced.
#[derive(Default)]
pub struct ViewRegistry {
    factories: HashMap<String, ViewFactory>,
    views: BTreeMap<LeafId, View>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` for `view_type`. Each type may be registered once.
    pub fn register(&mut self, view_type: &str, factory: ViewFactory) -> HabitudeResult<()> {
        if self.factories.contains_key(view_type) {
            return Err(HabitudeError::DuplicateViewType(view_type.to_string()));
        }
        self.factories.insert(view_type.to_string(), factory);
        tracing::debug!(view_type, "view type registered");
        Ok(())
    }

    pub fn is_registered(&self, view_type: &str) -> bool {
        self.factories.contains_key(view_type)
    }

    /// Live view bound to `leaf`.
    pub fn view(&self, leaf: LeafId) -> Option<&View> {
        self.views.get(&leaf)
    }

    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    /// Show `view_type`, reusing the first leaf already hosting it.
    ///
    /// A new leaf is only requested when the workspace has none of that
    /// type, so repeated activation converges on a single instance. Leaves
    /// are re-queried on every call, and views whose leaf the host dropped
    /// are closed first.
    pub async fn activate<W>(
        &mut self,
        workspace: &W,
        view_type: &str,
        ctx: &ViewContext<'_>,
    ) -> HabitudeResult<LeafId>
    where
        W: Workspace + ?Sized,
    {
        if !self.is_registered(view_type) {
            return Err(HabitudeError::UnknownViewType(view_type.to_string()));
        }
        self.prune_detached(workspace);

        let activation_failed = |source: HostError| HabitudeError::Activation {
            view_type: view_type.to_string(),
            source,
        };

        let leaf = match workspace.leaves_of_type(view_type).first() {
            Some(&leaf) => {
                tracing::debug!(view_type, %leaf, "reusing existing leaf");
                let bound = self
                    .views
                    .get(&leaf)
                    .is_some_and(|view| view.view_type() == view_type);
                if !bound {
                    // Leaf restored by the host before this extension loaded
                    self.instantiate(view_type, leaf, ctx)?;
                }
                leaf
            }
            None => {
                let leaf = workspace
                    .get_leaf(LeafPlacement::Reuse)
                    .await
                    .map_err(activation_failed)?;
                let state = ViewState {
                    view_type: view_type.to_string(),
                    active: true,
                };
                workspace
                    .set_view_state(leaf, state)
                    .await
                    .map_err(activation_failed)?;
                tracing::debug!(view_type, %leaf, "created leaf");
                self.instantiate(view_type, leaf, ctx)?;
                leaf
            }
        };

        workspace
            .reveal_leaf(leaf)
            .await
            .map_err(activation_failed)?;
        Ok(leaf)
    }

    fn instantiate(
        &mut self,
        view_type: &str,
        leaf: LeafId,
        ctx: &ViewContext<'_>,
    ) -> HabitudeResult<()> {
        let factory = self
            .factories
            .get(view_type)
            .ok_or_else(|| HabitudeError::UnknownViewType(view_type.to_string()))?;

        let mut view = factory(leaf, ctx);
        view.open(ctx);

        if let Some(mut previous) = self.views.insert(leaf, view) {
            previous.close();
        }
        Ok(())
    }

    /// Re-render every live view, e.g. after settings changed.
    pub fn refresh<W>(&mut self, workspace: &W, ctx: &ViewContext<'_>)
    where
        W: Workspace + ?Sized,
    {
        self.prune_detached(workspace);
        for view in self.views.values_mut() {
            view.open(ctx);
        }
    }

    /// Close views whose leaf no longer hosts their type.
    fn prune_detached<W>(&mut self, workspace: &W)
    where
        W: Workspace + ?Sized,
    {
        let detached: Vec<LeafId> = self
            .views
            .values()
            .filter(|view| !workspace.leaves_of_type(view.view_type()).contains(&view.leaf()))
            .map(View::leaf)
            .collect();

        for leaf in detached {
            tracing::debug!(%leaf, "closing view of detached leaf");
            self.close(leaf);
        }
    }

    /// Close the view bound to `leaf`. Returns whether one was live.
    pub fn close(&mut self, leaf: LeafId) -> bool {
        match self.views.remove(&leaf) {
            Some(mut view) => {
                view.close();
                true
            }
            None => false,
        }
    }

    pub fn close_all(&mut self) {
        for (_, mut view) in std::mem::take(&mut self.views) {
            view.close();
        }
    }
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .field("views", &self.views)
            .finish()
    }
}

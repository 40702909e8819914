//! Runtime context for canopy.
//!
//! [CanopyRoot] is created once at startup and owns everything the event loop needs: the
//! [Forest], the filesystem watchers, the receiving ends of the event and change channels,
//! and the editor used for opening files. It is torn down with [CanopyRoot::shutdown].

use crate::app::forest::{Forest, ForestError};
use crate::app::handlers::ClickTracker;
use crate::config::{Config, Editor};
use crate::core::events::FsEvent;
use crate::core::filter::{ExcludeFilter, FilterError};
use crate::core::watch::{self, RootChanged, WatchGuard};
use crate::ui::icons::NerdIcons;
use crate::utils::resolve_root;

use crossbeam_channel::Receiver;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Forest(#[from] ForestError),
    #[error("cannot open root '{path}': {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub struct CanopyRoot {
    pub forest: Forest,
    pub clicks: ClickTracker,
    events_rx: Receiver<FsEvent>,
    changes_rx: Receiver<RootChanged>,
    watches: Vec<WatchGuard>,
    editor: Editor,
    open_requests: Vec<PathBuf>,
    status: Option<String>,
}

impl CanopyRoot {
    /// Builds the runtime from the configuration. Roots default to the current directory.
    pub fn new(config: &Config) -> Result<Self, StartupError> {
        let mut roots = config.general().roots();
        if roots.is_empty() {
            roots.push(PathBuf::from("."));
        }
        let roots = roots
            .into_iter()
            .map(|path| resolve_root(&path).map_err(|source| StartupError::Root { path, source }))
            .collect::<Result<Vec<_>, _>>()?;

        let filter = ExcludeFilter::new(config.general().exclude())?;
        let forest = Forest::new(roots, filter, config.capabilities())?;
        Ok(Self::from_forest(forest, config))
    }

    /// Wraps an already built [Forest], wiring its events, watchers and display settings.
    pub fn from_forest(mut forest: Forest, config: &Config) -> Self {
        if config.general().icons() {
            forest.set_icon_provider(Arc::new(NerdIcons));
        }
        forest.set_panel_ratios(config.general().panel_ratios().to_vec());
        let events_rx = forest.events_mut().channel();

        let (changes_tx, changes_rx) = watch::change_channel();
        let mut watches = Vec::new();
        for (idx, panel) in forest.panels().iter().enumerate() {
            let root = panel.root_path();
            let tree = panel.tree();
            match tree.source().watch(root, watch::forward_to(changes_tx.clone(), idx)) {
                Ok(Some(guard)) => watches.push(guard),
                Ok(None) => {}
                Err(e) => tracing::warn!("cannot watch {}: {}", root.display(), e),
            }
        }
        tracing::info!(
            "started with {} root(s), {} watcher(s)",
            forest.panels().len(),
            watches.len()
        );

        Self {
            forest,
            clicks: ClickTracker::new(),
            events_rx,
            changes_rx,
            watches,
            editor: config.editor().clone(),
            open_requests: Vec::new(),
            status: None,
        }
    }

    /// Drains pending filesystem notices and emitted events.
    /// Returns true if anything happened that needs a redraw.
    pub fn update(&mut self) -> bool {
        let mut changed = false;

        let mut roots_changed = 0;
        for notice in self.changes_rx.try_iter() {
            tracing::trace!("change under root {}", notice.root);
            roots_changed += 1;
        }
        if roots_changed > 0 {
            self.forest.refresh();
            changed = true;
        }

        for event in self.events_rx.try_iter() {
            if let FsEvent::OpenFile(path) = &event {
                self.open_requests.push(path.clone());
            }
            self.status = Some(event.to_string());
            changed = true;
        }
        changed
    }

    /// Files the user asked to open since the last call.
    pub fn take_open_requests(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.open_requests)
    }

    #[inline]
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    #[inline]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    #[inline]
    pub fn watcher_count(&self) -> usize {
        self.watches.len()
    }

    /// Stops the watchers and releases the context.
    pub fn shutdown(self) {
        let count = self.watches.len();
        drop(self.watches);
        tracing::info!("shut down, {} watcher(s) stopped", count);
    }
}

//! Propagation session
//!
//! One [`Session`] owns every piece of pipeline state for one document: the
//! compiled per-selector sheets, the set of tracked shadow hosts, the
//! baseline adopted-stylesheet table, and the frame scheduler. Nothing is
//! process-global; independent sessions (and tests) never share state.
//!
//! The session also provides the interception seam: callers create shadow
//! roots through [`Session::attach_shadow`], which decorates the document's
//! native attach with the deferred propagation hook instead of patching a
//! shared entry point.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::compile::{compile_style_map, CompiledMap};
use crate::dark::is_darkened;
use crate::dom::{Document, NodeId, SheetHandle, ShadowRootMode};
use crate::extract::collect_document_styles;
use crate::schedule::{FrameScheduler, Task};
use crate::Result;

/// Boolean attribute on the bootstrapping `<script>` element that, if
/// present at document-ready time, permanently disables live re-sync.
pub const STATIC_ATTRIBUTE: &str = "half-light-static";

/// Controller for cross-root style propagation over one document.
pub struct Session {
  scheduler: FrameScheduler,
  compiled: CompiledMap,
  /// Shadow hosts eligible for live re-sync. Entered once, at shadow-root
  /// creation; only ever emptied by the opt-out.
  stylable: FxHashSet<NodeId>,
  /// Adopted-stylesheet lists as they stood before any propagation, used as
  /// the reset baseline on every re-application. `NodeId` keys are
  /// non-owning.
  baselines: FxHashMap<NodeId, Vec<SheetHandle>>,
  /// Cleared by the one-time opt-out; gates both observation and tracking.
  live: bool,
  bootstrap_script: Option<NodeId>,
}

impl Default for Session {
  fn default() -> Self {
    Self::new()
  }
}

impl Session {
  /// Creates a session and schedules the initial stylesheet scan for the
  /// first frame.
  pub fn new() -> Self {
    let mut scheduler = FrameScheduler::new();
    scheduler.schedule(Task::SyncAll);
    Session {
      scheduler,
      compiled: CompiledMap::new(),
      stylable: FxHashSet::default(),
      baselines: FxHashMap::default(),
      live: true,
      bootstrap_script: None,
    }
  }

  /// Points the session at the `<script>` element that bootstrapped it, so
  /// [`Session::document_ready`] can find the opt-out attribute.
  pub fn with_bootstrap_script(mut self, script: NodeId) -> Self {
    self.bootstrap_script = Some(script);
    self
  }

  /// Whether live re-sync is still enabled.
  pub fn is_live(&self) -> bool {
    self.live
  }

  /// The hosts currently tracked for live re-sync.
  pub fn tracked_hosts(&self) -> impl Iterator<Item = NodeId> + '_ {
    self.stylable.iter().copied()
  }

  /// True when deferred work is pending for the next frame.
  pub fn has_pending_work(&self) -> bool {
    !self.scheduler.is_idle()
  }

  // --------------------------------------------------------------------------
  // Shadow attachment interception
  // --------------------------------------------------------------------------

  /// Attaches a shadow root to `host`, decorated with the propagation hook.
  ///
  /// The native attach runs first and its result is returned unmodified;
  /// failures pass straight through. Closed roots are left untouched. For
  /// open roots the rest of the logic runs on the next frame, after the
  /// caller has finished populating the new root.
  pub fn attach_shadow(
    &mut self,
    doc: &mut Document,
    host: NodeId,
    mode: ShadowRootMode,
  ) -> Result<NodeId> {
    let root = doc.attach_shadow(host, mode)?;
    if mode == ShadowRootMode::Open {
      log::trace!("deferring cross-root styling for new shadow host {host:?}");
      self.scheduler.schedule(Task::StyleHost(host));
    }
    Ok(root)
  }

  /// Runs one frame's worth of deferred work.
  pub fn run_frame(&mut self, doc: &mut Document) {
    for task in self.scheduler.take_frame() {
      match task {
        Task::SyncAll => self.sync(doc),
        Task::StyleHost(host) => self.style_new_host(doc, host),
      }
    }
  }

  fn style_new_host(&mut self, doc: &mut Document, host: NodeId) {
    let Some(root) = doc.shadow_root(host) else {
      return;
    };
    if doc.shadow_mode(root) != Some(ShadowRootMode::Open) {
      return;
    }
    if is_darkened(doc, root) {
      log::debug!("skipping darkened shadow host {host:?}");
      return;
    }
    if self.live {
      self.stylable.insert(host);
    }
    if !self.baselines.contains_key(&host) {
      self
        .baselines
        .insert(host, doc.adopted_stylesheets(root).to_vec());
    }
    self.apply(doc, host);
  }

  // --------------------------------------------------------------------------
  // Apply / reset
  // --------------------------------------------------------------------------

  /// Restores a host's shadow root to its recorded pre-propagation adopted
  /// list (empty if none was recorded).
  fn reset_to_baseline(&self, doc: &mut Document, host: NodeId) {
    let Some(root) = doc.shadow_root(host) else {
      return;
    };
    let baseline = self.baselines.get(&host).cloned().unwrap_or_default();
    doc.set_adopted_stylesheets(root, baseline);
  }

  /// Appends each compiled sheet whose selector matches `host`, in compiled
  /// map order. A host matching several selectors adopts several sheets.
  fn apply(&self, doc: &mut Document, host: NodeId) {
    let Some(root) = doc.shadow_root(host) else {
      return;
    };
    for (selector, sheet) in &self.compiled {
      if matches!(doc.element_matches(host, selector), Ok(true)) {
        doc.push_adopted_stylesheet(root, sheet.clone());
      }
    }
  }

  // --------------------------------------------------------------------------
  // Live sync
  // --------------------------------------------------------------------------

  /// Full pipeline pass: re-extract, re-compile, and re-apply to every
  /// tracked host. Safe to trigger back-to-back; each pass recomputes from
  /// the document's full current state.
  pub fn sync(&mut self, doc: &mut Document) {
    let map = collect_document_styles(doc);
    self.compiled = compile_style_map(&map);
    log::debug!(
      "sync pass: {} selector(s), {} tracked host(s)",
      self.compiled.len(),
      self.stylable.len()
    );

    let hosts: Vec<NodeId> = self.stylable.iter().copied().collect();
    for host in hosts {
      self.reset_to_baseline(doc, host);
      self.apply(doc, host);
    }
  }

  /// Delivers the pending mutation batch.
  ///
  /// Any record targeting the document's style-bearing region (`<head>` and
  /// its subtree) triggers one full recomputation; the batch is never
  /// treated as per-rule deltas. A no-op once the opt-out has fired.
  pub fn flush_mutations(&mut self, doc: &mut Document) {
    let records = doc.take_mutations();
    if !self.live {
      return;
    }
    let Some(head) = doc.head() else {
      return;
    };
    let relevant = records
      .iter()
      .any(|record| doc.is_inclusive_descendant(record.target, head));
    if relevant {
      self.sync(doc);
    }
  }

  /// One-time check at document-ready: if the bootstrapping script carries
  /// the `half-light-static` attribute, observation stops permanently and
  /// the tracked-host set is cleared. Shadow roots attached afterwards still
  /// receive their one-time initial application but are never re-synced.
  pub fn document_ready(&mut self, doc: &Document) {
    let Some(script) = self.bootstrap_script else {
      return;
    };
    if doc.has_attribute(script, STATIC_ATTRIBUTE) {
      log::debug!("live re-sync disabled via {STATIC_ATTRIBUTE}");
      self.live = false;
      self.stylable.clear();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_session_schedules_the_initial_scan() {
    let session = Session::new();
    assert!(session.has_pending_work());
  }

  #[test]
  fn closed_roots_pass_through_without_deferred_work() {
    let mut doc = Document::new();
    let mut session = Session::new();
    session.run_frame(&mut doc); // drain the initial scan

    let body = doc.body().unwrap();
    let host = doc.create_element("x-widget");
    doc.append_child(body, host);
    let root = session
      .attach_shadow(&mut doc, host, ShadowRootMode::Closed)
      .unwrap();

    assert!(!session.has_pending_work());
    session.run_frame(&mut doc);
    assert!(doc.adopted_stylesheets(root).is_empty());
    assert_eq!(session.tracked_hosts().count(), 0);
  }

  #[test]
  fn attach_shadow_propagates_native_failures() {
    let mut doc = Document::new();
    let mut session = Session::new();
    let body = doc.body().unwrap();
    let host = doc.create_element("x-widget");
    doc.append_child(body, host);

    session.attach_shadow(&mut doc, host, ShadowRootMode::Open).unwrap();
    assert!(session.attach_shadow(&mut doc, host, ShadowRootMode::Open).is_err());
  }

  #[test]
  fn baseline_is_recorded_once_per_host() {
    let mut doc = Document::new();
    let mut session = Session::new();
    let head = doc.head().unwrap();
    let style = doc.append_style(head, ".x { color: red; }");
    doc.set_attribute(style, "media", "--crossroot");
    session.run_frame(&mut doc);

    let body = doc.body().unwrap();
    let host = doc.create_element("x-widget");
    doc.append_child(body, host);
    session.attach_shadow(&mut doc, host, ShadowRootMode::Open).unwrap();
    session.run_frame(&mut doc);

    let recorded = session.baselines.get(&host).cloned().unwrap();
    assert!(recorded.is_empty(), "baseline predates propagation");

    // A later sync must not fold propagated sheets into the baseline.
    session.sync(&mut doc);
    assert_eq!(session.baselines.get(&host).cloned().unwrap().len(), 0);
  }
}

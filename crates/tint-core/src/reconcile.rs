//! One reconciliation pass
//!
//! A pass reads everything fresh (element, cookies, mapping) and is safe to
//! repeat or interleave with another pass: each one writes the color it
//! decided, and the last writer wins until the next pass corrects it.

use crate::baseline::BaselineMemo;
use crate::config::TintConfig;
use crate::page::{CookieSource, NavElement, PageDom};
use crate::store::MappingStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tint_identity::{IdentityResolver, Resolution, SessionIdentity};
use tracing::{debug, error, info};

/// Why a pass fell back to the baseline color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    /// No credential cookie, or no alias in it
    NoIdentity,
    /// Credential cookie could not be parsed
    ParseError,
    /// Alias has no configured color
    NoMatch,
    /// Mapping could not be read
    StorageError,
}

/// What a pass decided to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Navigation element not on the page yet
    NoTarget,
    /// Paint the configured color
    Apply {
        color: String,
        identity: SessionIdentity,
    },
    /// Restore the baseline color
    Reset { baseline: String, reason: ResetReason },
}

impl Decision {
    /// Color this decision writes, if any
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        match self {
            Self::NoTarget => None,
            Self::Apply { color, .. } => Some(color),
            Self::Reset { baseline, .. } => Some(baseline),
        }
    }

    /// Reset reason, if this is a reset
    #[must_use]
    pub fn reset_reason(&self) -> Option<ResetReason> {
        match self {
            Self::Reset { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Result of one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    /// What was decided
    pub decision: Decision,
    /// Whether the element's style was written
    pub wrote: bool,
}

/// Counters across passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Passes run
    pub passes: u64,
    /// Passes that found no target
    pub skipped: u64,
    /// Passes that painted a configured color
    pub applied: u64,
    /// Passes that fell back to the baseline
    pub resets: u64,
    /// Style writes performed
    pub writes: u64,
}

/// Runs reconciliation passes against a page
pub struct Reconciler<D: PageDom, S, C> {
    config: TintConfig,
    resolver: IdentityResolver,
    dom: Arc<D>,
    store: Arc<S>,
    cookies: Arc<C>,
    baselines: BaselineMemo<D::Element>,
    stats: Mutex<PassStats>,
}

impl<D, S, C> Reconciler<D, S, C>
where
    D: PageDom,
    S: MappingStore,
    C: CookieSource,
{
    /// Create reconciler
    #[must_use]
    pub fn new(config: TintConfig, dom: Arc<D>, store: Arc<S>, cookies: Arc<C>) -> Self {
        Self {
            resolver: IdentityResolver::new(config.credentials.clone()),
            config,
            dom,
            store,
            cookies,
            baselines: BaselineMemo::new(),
            stats: Mutex::new(PassStats::default()),
        }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TintConfig {
        &self.config
    }

    /// Page adapter
    #[inline]
    #[must_use]
    pub fn dom(&self) -> &Arc<D> {
        &self.dom
    }

    /// Mapping store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Baselines captured so far
    #[inline]
    #[must_use]
    pub fn baselines(&self) -> &BaselineMemo<D::Element> {
        &self.baselines
    }

    /// Snapshot of pass counters
    #[inline]
    #[must_use]
    pub fn stats(&self) -> PassStats {
        *self.stats.lock()
    }

    /// Run one pass: locate, capture baseline, decide, apply
    pub async fn reconcile(&self) -> PassOutcome {
        let Some(element) = self
            .dom
            .query_target(&self.config.container_id, &self.config.target_tag)
        else {
            self.record(&Decision::NoTarget, false);
            return PassOutcome {
                decision: Decision::NoTarget,
                wrote: false,
            };
        };

        let baseline = self
            .baselines
            .get_or_capture(&element, || capture_baseline(&*element));

        let decision = self.decide(baseline).await;
        let wrote = decision
            .color()
            .is_some_and(|color| apply(&*element, color));

        if let (Decision::Apply { color, identity }, true) = (&decision, wrote) {
            info!(alias = identity.alias(), color = color.as_str(), "applied alias color");
        }
        self.record(&decision, wrote);

        PassOutcome { decision, wrote }
    }

    async fn decide(&self, baseline: String) -> Decision {
        let identity = match self.resolver.resolve(&self.cookies.cookie_text()) {
            Resolution::Found(identity) => identity,
            Resolution::NotPresent => {
                return Decision::Reset {
                    baseline,
                    reason: ResetReason::NoIdentity,
                }
            }
            Resolution::ParseError(err) => {
                error!(error = %err, fragment = err.raw(), "failed to parse credential cookie");
                return Decision::Reset {
                    baseline,
                    reason: ResetReason::ParseError,
                };
            }
        };

        let mapping = match self.store.get(&self.config.storage_key).await {
            Ok(mapping) => mapping.unwrap_or_default(),
            Err(err) => {
                error!(error = %err, "failed to read alias colors");
                return Decision::Reset {
                    baseline,
                    reason: ResetReason::StorageError,
                };
            }
        };

        match mapping.lookup(&identity) {
            Some(found) => Decision::Apply {
                color: found.color.to_string(),
                identity,
            },
            None => {
                debug!(alias = identity.alias(), "no color configured for alias");
                Decision::Reset {
                    baseline,
                    reason: ResetReason::NoMatch,
                }
            }
        }
    }

    fn record(&self, decision: &Decision, wrote: bool) {
        let mut stats = self.stats.lock();
        stats.passes += 1;
        match decision {
            Decision::NoTarget => stats.skipped += 1,
            Decision::Apply { .. } => stats.applied += 1,
            Decision::Reset { .. } => stats.resets += 1,
        }
        if wrote {
            stats.writes += 1;
        }
    }
}

impl<D: PageDom, S, C> std::fmt::Debug for Reconciler<D, S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .field("baselines", &self.baselines.len())
            .field("stats", &*self.stats.lock())
            .finish_non_exhaustive()
    }
}

/// Inline background if set, computed otherwise
fn capture_baseline(element: &impl NavElement) -> String {
    let inline = element.inline_background();
    if inline.is_empty() {
        element.computed_background()
    } else {
        inline
    }
}

/// Write `color` unless the inline style already shows it
fn apply(element: &impl NavElement, color: &str) -> bool {
    if element.inline_background() == color {
        return false;
    }
    element.set_background(color);
    true
}

//! Domain signals and their subscribers.
//!
//! Subscribers are registered explicitly on a [`SignalBus`] at startup. Each call is isolated:
//! a subscriber that fails or panics is logged and the remaining subscribers still run.

use crate::models::{FieldChange, Package, TrackedField, WatchedItem};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Names of the signals raised while watching and updating items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    ItemAdded,
    ItemRemoved,
    PackageLinked,
    CurrencyChanged,
    PriceChanged,
    ReleaseDateChanged,
    ComingSoonChanged,
    PlatformSupportChanged,
}

impl SignalKind {
    pub const ALL: [SignalKind; 8] = [
        SignalKind::ItemAdded,
        SignalKind::ItemRemoved,
        SignalKind::PackageLinked,
        SignalKind::CurrencyChanged,
        SignalKind::PriceChanged,
        SignalKind::ReleaseDateChanged,
        SignalKind::ComingSoonChanged,
        SignalKind::PlatformSupportChanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::ItemAdded => "item_added",
            SignalKind::ItemRemoved => "item_removed",
            SignalKind::PackageLinked => "group_linked",
            SignalKind::CurrencyChanged => "currency_changed",
            SignalKind::PriceChanged => "price_changed",
            SignalKind::ReleaseDateChanged => "release_date_changed",
            SignalKind::ComingSoonChanged => "coming_soon_changed",
            SignalKind::PlatformSupportChanged => "platform_support_changed",
        }
    }
}

impl From<TrackedField> for SignalKind {
    fn from(field: TrackedField) -> Self {
        match field {
            TrackedField::Currency => SignalKind::CurrencyChanged,
            TrackedField::Price => SignalKind::PriceChanged,
            TrackedField::ReleaseDate => SignalKind::ReleaseDateChanged,
            TrackedField::ComingSoon => SignalKind::ComingSoonChanged,
            TrackedField::SupportsLinux => SignalKind::PlatformSupportChanged,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raised signal with the entities it concerns
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    ItemAdded {
        item: WatchedItem,
    },
    ItemRemoved {
        item: WatchedItem,
    },
    PackageLinked {
        package: Package,
        item: WatchedItem,
    },
    /// One tracked field of a package changed between two snapshots
    FieldChanged {
        package: Package,
        change: FieldChange,
    },
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::ItemAdded { .. } => SignalKind::ItemAdded,
            Signal::ItemRemoved { .. } => SignalKind::ItemRemoved,
            Signal::PackageLinked { .. } => SignalKind::PackageLinked,
            Signal::FieldChanged { change, .. } => change.field.into(),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::ItemAdded { item } | Signal::ItemRemoved { item } => {
                write!(f, "{} {} ({})", self.kind(), item.display_name(), item.steam_id)
            }
            Signal::PackageLinked { package, item } => write!(
                f,
                "{} package {} to {}",
                self.kind(),
                package.display_name(),
                item.display_name()
            ),
            Signal::FieldChanged { package, change } => write!(
                f,
                "{} {}: {} -> {}",
                self.kind(),
                package.display_name(),
                change.previous,
                change.current
            ),
        }
    }
}

/// Signal subscriber. Errors are logged by the bus and never reach the emitter.
pub type SignalHandler = Box<dyn Fn(&Signal) -> anyhow::Result<()> + Send + Sync>;

/// Registry of subscribers per signal kind
#[derive(Default)]
pub struct SignalBus {
    handlers: HashMap<SignalKind, Vec<(String, SignalHandler)>>,
}

impl SignalBus {
    /// A bus without subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus that logs every signal at debug level
    pub fn with_logging() -> Self {
        let mut bus = Self::new();
        for kind in SignalKind::ALL {
            bus.subscribe(kind, "log_signal", |signal| {
                debug!("Signal: {}", signal);
                Ok(())
            });
        }
        bus
    }

    /// Register a named subscriber for one signal kind
    pub fn subscribe<F>(&mut self, kind: SignalKind, name: impl Into<String>, handler: F)
    where
        F: Fn(&Signal) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handlers
            .entry(kind)
            .or_default()
            .push((name.into(), Box::new(handler)));
    }

    pub fn subscriber_count(&self, kind: SignalKind) -> usize {
        self.handlers.get(&kind).map(Vec::len).unwrap_or(0)
    }

    /// Deliver a signal to its subscribers in registration order.
    /// Returns the number of subscribers that completed without error.
    pub fn emit(&self, signal: &Signal) -> usize {
        let kind = signal.kind();
        let Some(handlers) = self.handlers.get(&kind) else {
            return 0;
        };

        let mut delivered = 0;
        for (name, handler) in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(signal))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => error!("Subscriber {} failed on {}: {:#}", name, kind, e),
                Err(_) => error!("Subscriber {} panicked on {}", name, kind),
            }
        }
        delivered
    }
}

impl fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(kind, handlers)| (kind.as_str(), handlers.len()))
            .collect();
        f.debug_struct("SignalBus").field("handlers", &counts).finish()
    }
}

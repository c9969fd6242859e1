//! MX-record lookups behind a trait, so validation can run offline in
//! tests and cache answers per domain during a batch.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::Resolver;
use tracing::debug;

use crate::error::RosterError;

/// Answers "does this domain accept mail?". Implementations must be safe
/// to share across the validation worker threads.
pub trait MxLookup: Send + Sync {
    fn has_mx(&self, domain: &str) -> bool;
}

/// System-DNS lookup with a 3-second timeout.
pub struct DnsMx {
    resolver: Resolver,
}

impl DnsMx {
    pub fn new() -> Result<Self, RosterError> {
        let mut opts = ResolverOpts::default();
        opts.timeout = Duration::from_secs(3);
        let resolver = Resolver::new(ResolverConfig::default(), opts)
            .map_err(|e| RosterError::Resolver(e.to_string()))?;
        Ok(Self { resolver })
    }
}

impl MxLookup for DnsMx {
    fn has_mx(&self, domain: &str) -> bool {
        match self.resolver.mx_lookup(domain) {
            Ok(answer) => answer.iter().next().is_some(),
            Err(e) => {
                debug!(domain, error = %e, "mx lookup failed");
                false
            }
        }
    }
}

/// Per-domain answer cache in front of any resolver. A validation run hits
/// the same handful of domains hundreds of times.
pub struct CachedMx<R> {
    inner: R,
    cache: Mutex<HashMap<String, bool>>,
}

impl<R: MxLookup> CachedMx<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl<R: MxLookup> MxLookup for CachedMx<R> {
    fn has_mx(&self, domain: &str) -> bool {
        let key = domain.to_lowercase();
        if let Some(&hit) = self.cache.lock().unwrap().get(&key) {
            return hit;
        }
        let answer = self.inner.has_mx(domain);
        self.cache.lock().unwrap().insert(key, answer);
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl MxLookup for Counting {
        fn has_mx(&self, domain: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            domain == "example.com"
        }
    }

    #[test]
    fn test_cache_asks_each_domain_once() {
        let cached = CachedMx::new(Counting {
            calls: AtomicUsize::new(0),
        });

        assert!(cached.has_mx("example.com"));
        assert!(cached.has_mx("EXAMPLE.com"));
        assert!(!cached.has_mx("nope.invalid"));
        assert!(!cached.has_mx("nope.invalid"));

        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }
}

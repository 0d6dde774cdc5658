use alloc::sync::Arc;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use log::{debug, trace};

use crate::bean::BeanDescription;
use crate::class::{ClassDef, ClassProvider};
use crate::collector::{CollectedMembers, MemberCollector};
use crate::config::IntrospectionConfig;
use crate::hash::HashMap;
use crate::resolver::PropertyResolver;
use crate::types::TypeDescriptor;
use crate::{IntrospectionError, ResolveError};

/// Builds and caches [`BeanDescription`]s.
///
/// Descriptions are cached per [`TypeDescriptor`] for the lifetime of the
/// introspector. Failures are never cached; a later call retries.
///
/// The introspector is `Send + Sync`. Concurrent first-time requests for the
/// same type may each resolve it, but all of them receive the description
/// that was published first.
pub struct ClassIntrospector {
    provider: Arc<dyn ClassProvider>,
    config: IntrospectionConfig,
    cache: RwLock<HashMap<TypeDescriptor, Arc<BeanDescription>>>,
}

impl ClassIntrospector {
    /// Creates an introspector with the default configuration.
    pub fn new(provider: impl ClassProvider + 'static) -> Self {
        Self::with_config(provider, IntrospectionConfig::default())
    }

    pub fn with_config(provider: impl ClassProvider + 'static, config: IntrospectionConfig) -> Self {
        Self::from_shared(Arc::new(provider), config)
    }

    /// Creates an introspector over a provider shared with other components.
    pub fn from_shared(provider: Arc<dyn ClassProvider>, config: IntrospectionConfig) -> Self {
        Self {
            provider,
            config,
            cache: RwLock::new(HashMap::default()),
        }
    }

    #[inline]
    pub fn provider(&self) -> &dyn ClassProvider {
        &*self.provider
    }

    #[inline]
    pub fn config(&self) -> &IntrospectionConfig {
        &self.config
    }

    /// Returns the class metadata of `ty`, uncached.
    #[inline]
    pub fn describe_class(&self, ty: &TypeDescriptor) -> Result<Arc<ClassDef>, IntrospectionError> {
        self.provider.describe(ty)
    }

    /// Collects the members of `ty`, uncached.
    pub fn collect(&self, ty: &TypeDescriptor) -> Result<CollectedMembers, IntrospectionError> {
        MemberCollector::new(&*self.provider, &*self.config.annotations).collect(ty)
    }

    /// Returns the description of `ty`, building it on first request.
    pub fn introspect(&self, ty: &TypeDescriptor) -> Result<Arc<BeanDescription>, ResolveError> {
        if let Some(desc) = self.cache.read().unwrap_or_else(PoisonError::into_inner).get(ty) {
            trace!("bean description cache hit for `{ty}`");
            return Ok(desc.clone());
        }

        let desc = Arc::new(self.build(ty)?);

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(ty.clone()).or_insert(desc).clone())
    }

    /// Builds the description of `ty` without consulting the cache.
    pub fn build(&self, ty: &TypeDescriptor) -> Result<BeanDescription, ResolveError> {
        let members = self.collect(ty)?;
        let class = members.class_def().clone();
        let class_annotations = members.class_annotations().clone();
        let resolution = PropertyResolver::new(&self.config).resolve(members)?;

        debug!(
            "built bean description of `{ty}` with {} propert(ies)",
            resolution.properties().len()
        );

        Ok(BeanDescription::new(
            ty.clone(),
            class,
            class_annotations,
            self.config.naming.clone(),
            resolution,
        ))
    }

    /// Returns the number of cached descriptions.
    pub fn cached(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl fmt::Debug for ClassIntrospector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassIntrospector")
            .field("config", &self.config)
            .field("cached", &self.cached())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use super::*;
    use crate::fixtures;
    use crate::ConflictError;

    #[test]
    fn descriptions_are_cached() {
        let introspector = ClassIntrospector::new(fixtures::table());
        let first = introspector.introspect(&fixtures::point()).unwrap();
        let second = introspector.introspect(&fixtures::point()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(introspector.cached(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let introspector = ClassIntrospector::new(fixtures::table());
        let bag = TypeDescriptor::simple("Bag");

        for _ in 0..2 {
            let err = introspector.introspect(&bag).unwrap_err();
            assert!(matches!(err, ResolveError::Conflict(ConflictError::DuplicateSpecial { .. })));
        }
        assert_eq!(introspector.cached(), 0);
    }

    #[test]
    fn concurrent_requests_share_one_description() {
        let introspector = ClassIntrospector::new(fixtures::table());
        let ty = fixtures::person();

        let results: Vec<Arc<BeanDescription>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| introspector.introspect(&ty).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn generic_parameterizations_are_distinct() {
        let introspector = ClassIntrospector::new(fixtures::table());
        let of_string = TypeDescriptor::generic("Base", [TypeDescriptor::of::<alloc::string::String>()]);
        let of_int = TypeDescriptor::generic("Base", [TypeDescriptor::of::<i32>()]);

        let a = introspector.introspect(&of_string).unwrap();
        let b = introspector.introspect(&of_int).unwrap();

        assert!(a.is_abstract());
        assert_eq!(a.find_property("value").unwrap().declared_type(), &of_string.bindings()[0]);
        assert_eq!(b.find_property("value").unwrap().declared_type(), &of_int.bindings()[0]);
        assert_eq!(introspector.cached(), 2);
    }
}

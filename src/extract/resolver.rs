// Mon Oct 19 2026 - Alex

use super::reference::{RawReference, Reference};
use crate::classfile::{AccessFlags, ClassFile};
use crate::descriptor::{ElementDescriptor, MethodDescriptor, TypeDescriptor};
use crate::model::{ApiAnnotations, Baseline, Location, ReferenceKind};
use ahash::AHashSet;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

pub const DEFAULT_CACHE_CAPACITY: usize = 300;

/// The parts of a parsed type needed to walk its hierarchy.
#[derive(Debug)]
struct TypeInfo {
    component: String,
    descriptor: TypeDescriptor,
    super_class: Option<TypeDescriptor>,
    interfaces: Vec<TypeDescriptor>,
    methods: Vec<(String, String, AccessFlags)>,
    fields: Vec<String>,
}

impl TypeInfo {
    fn from_class(component: &str, class: &ClassFile) -> Self {
        Self {
            component: component.to_string(),
            descriptor: class.type_descriptor(),
            super_class: class.super_descriptor(),
            interfaces: class.interface_descriptors(),
            methods: class
                .methods
                .iter()
                .map(|m| (m.name.clone(), m.descriptor.clone(), m.access_flags))
                .collect(),
            fields: class.fields.iter().map(|f| f.name.clone()).collect(),
        }
    }

    fn method_flags(&self, name: &str, signature: &str) -> Option<AccessFlags> {
        self.methods
            .iter()
            .find(|(n, s, _)| n == name && s == signature)
            .map(|(_, _, flags)| *flags)
    }

    fn declares_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }
}

type CacheKey = (String, TypeDescriptor);

struct TypeCache {
    entries: IndexMap<CacheKey, Option<Arc<TypeInfo>>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl TypeCache {
    fn get(&mut self, key: &CacheKey) -> Option<Option<Arc<TypeInfo>>> {
        match self.entries.get_index_of(key) {
            Some(index) => {
                self.hits += 1;
                let last = self.entries.len() - 1;
                self.entries.move_index(index, last);
                self.entries.get(key).cloned()
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    fn insert(&mut self, key: CacheKey, info: Option<Arc<TypeInfo>>) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, info);
    }
}

/// Turns raw references into located, annotated references against one
/// baseline.
pub struct ReferenceResolver<'a> {
    baseline: &'a Baseline,
    cache: Mutex<TypeCache>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(baseline: &'a Baseline) -> Self {
        Self::with_cache_capacity(baseline, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(baseline: &'a Baseline, capacity: usize) -> Self {
        Self {
            baseline,
            cache: Mutex::new(TypeCache {
                entries: IndexMap::new(),
                capacity: capacity.max(1),
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub fn baseline(&self) -> &Baseline {
        self.baseline
    }

    /// Resolves one reference read from a type of `source_component`.
    /// Returns `None` only for override candidates that do not override
    /// anything.
    pub fn resolve(&self, source_component: &str, raw: RawReference) -> Option<Reference> {
        let kind = raw.kind();
        let line = raw.line();
        let source = Location::new(source_component, raw.source().clone());

        let (target, annotations) = match raw.target() {
            ElementDescriptor::Method(method) if kind == ReferenceKind::Override => {
                return self.resolve_override(source, method, line);
            }
            ElementDescriptor::Type(ty) => match self.baseline.find_type_owner(source_component, ty) {
                Some(owner) => (
                    Location::new(owner.id(), ty.clone()),
                    Some(owner.api_description().resolve(raw.target())),
                ),
                None => (Location::unowned(ty.clone()), None),
            },
            ElementDescriptor::Method(method) => self.resolve_member(
                source_component,
                method.owner(),
                |start| {
                    self.find_declaring(start, &|info: &TypeInfo| {
                        info.method_flags(method.name(), method.signature()).is_some()
                    })
                },
                |owner| method.with_owner(owner).into(),
            ),
            ElementDescriptor::Field(field) => self.resolve_member(
                source_component,
                field.owner(),
                |start| self.find_declaring_field(start, field.name(), &mut AHashSet::new()),
                |owner| field.with_owner(owner).into(),
            ),
            ElementDescriptor::Package(_) => (Location::unowned(raw.target().clone()), None),
        };

        Some(
            Reference::new(source, target, kind)
                .with_line(line)
                .with_annotations(annotations),
        )
    }

    pub fn resolve_all(&self, source_component: &str, raws: Vec<RawReference>) -> Vec<Reference> {
        raws.into_iter()
            .filter_map(|raw| self.resolve(source_component, raw))
            .collect()
    }

    /// (hits, misses) of the parsed-type cache.
    pub fn cache_stats(&self) -> (u64, u64) {
        let cache = self.cache.lock();
        (cache.hits, cache.misses)
    }

    fn resolve_member<F, R>(
        &self,
        source_component: &str,
        named: &TypeDescriptor,
        find: F,
        rebuild: R,
    ) -> (Location, Option<ApiAnnotations>)
    where
        F: FnOnce(Arc<TypeInfo>) -> Option<Arc<TypeInfo>>,
        R: Fn(TypeDescriptor) -> ElementDescriptor,
    {
        let start = match self.type_info(source_component, named) {
            Some(info) => info,
            None => {
                let element = rebuild(named.clone());
                return match self.baseline.find_type_owner(source_component, named) {
                    Some(owner) => {
                        let annotations = owner.api_description().resolve(&element);
                        (Location::new(owner.id(), element), Some(annotations))
                    }
                    None => (Location::unowned(element), None),
                };
            }
        };

        let declaring = find(start.clone()).unwrap_or(start);
        let element = rebuild(declaring.descriptor.clone());
        let annotations = self.annotations_in(&declaring.component, &element);
        (Location::new(&declaring.component, element), annotations)
    }

    /// Walks the superclass chain, then the superinterfaces of every class on
    /// it, for the first type declaring the method.
    fn find_declaring<D>(&self, start: Arc<TypeInfo>, declares: &D) -> Option<Arc<TypeInfo>>
    where
        D: Fn(&TypeInfo) -> bool,
    {
        let mut visited: AHashSet<TypeDescriptor> = AHashSet::new();
        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(info) = current {
            if !visited.insert(info.descriptor.clone()) {
                break;
            }
            if declares(&info) {
                return Some(info);
            }
            current = info
                .super_class
                .as_ref()
                .and_then(|s| self.type_info(&info.component, s));
            chain.push(info);
        }

        let mut queue: VecDeque<Arc<TypeInfo>> = VecDeque::new();
        for class in &chain {
            for interface in &class.interfaces {
                if let Some(info) = self.type_info(&class.component, interface) {
                    queue.push_back(info);
                }
            }
        }
        while let Some(info) = queue.pop_front() {
            if !visited.insert(info.descriptor.clone()) {
                continue;
            }
            if declares(&info) {
                return Some(info);
            }
            for interface in &info.interfaces {
                if let Some(next) = self.type_info(&info.component, interface) {
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Field lookup order of the JVM: the type itself, then its direct
    /// superinterfaces recursively, then its superclass.
    fn find_declaring_field(
        &self,
        info: Arc<TypeInfo>,
        name: &str,
        visited: &mut AHashSet<TypeDescriptor>,
    ) -> Option<Arc<TypeInfo>> {
        if !visited.insert(info.descriptor.clone()) {
            return None;
        }
        if info.declares_field(name) {
            return Some(info);
        }
        for interface in &info.interfaces {
            if let Some(next) = self.type_info(&info.component, interface) {
                if let Some(found) = self.find_declaring_field(next, name, visited) {
                    return Some(found);
                }
            }
        }
        let super_class = info
            .super_class
            .as_ref()
            .and_then(|s| self.type_info(&info.component, s))?;
        self.find_declaring_field(super_class, name, visited)
    }

    /// Confirms an override candidate against the superclass chain. The
    /// nearest declaration carrying a restriction wins, otherwise the nearest
    /// declaration. Package-private declarations only count from the source's
    /// own package.
    fn resolve_override(&self, source: Location, method: &MethodDescriptor, line: Option<u16>) -> Option<Reference> {
        let source_component = source.component()?.to_string();
        let source_package = source.type_descriptor()?.package_name().to_string();
        let mut nearest: Option<(Location, ApiAnnotations)> = None;
        let mut visited: AHashSet<TypeDescriptor> = AHashSet::new();
        let mut current = self.type_info(&source_component, method.owner());

        while let Some(info) = current {
            if !visited.insert(info.descriptor.clone()) {
                break;
            }
            if let Some(flags) = info.method_flags(method.name(), method.signature()) {
                let package_private = !flags.intersects(AccessFlags::PUBLIC | AccessFlags::PROTECTED);
                let same_package = info.descriptor.package_name() == source_package;
                if !flags.is_static()
                    && !flags.is_private()
                    && !flags.contains(AccessFlags::FINAL)
                    && (!package_private || same_package)
                {
                    let element: ElementDescriptor = method.with_owner(info.descriptor.clone()).into();
                    let annotations = self.annotations_in(&info.component, &element).unwrap_or_default();
                    let target = Location::new(&info.component, element);
                    if !annotations.restrictions.is_empty() {
                        nearest = Some((target, annotations));
                        break;
                    }
                    if nearest.is_none() {
                        nearest = Some((target, annotations));
                    }
                }
            }
            current = info
                .super_class
                .as_ref()
                .and_then(|s| self.type_info(&info.component, s));
        }

        match nearest {
            Some((target, annotations)) => Some(
                Reference::new(source, target, ReferenceKind::Override)
                    .with_line(line)
                    .with_annotations(Some(annotations)),
            ),
            None => {
                log::trace!("{} overrides nothing visible", source);
                None
            }
        }
    }

    fn annotations_in(&self, component: &str, element: &ElementDescriptor) -> Option<ApiAnnotations> {
        self.baseline
            .component(component)
            .map(|c| c.api_description().resolve(element))
    }

    fn type_info(&self, from_component: &str, ty: &TypeDescriptor) -> Option<Arc<TypeInfo>> {
        let owner = self.baseline.find_type_owner(from_component, ty)?;
        let key = (owner.id().to_string(), ty.clone());
        if let Some(cached) = self.cache.lock().get(&key) {
            return cached;
        }

        let info = match owner.read_type(ty) {
            Ok(bytes) => match ClassFile::parse(&bytes) {
                Ok(class) => Some(Arc::new(TypeInfo::from_class(owner.id(), &class))),
                Err(e) => {
                    log::debug!("Cannot parse {} in {}: {}", ty, owner.id(), e);
                    None
                }
            },
            Err(e) => {
                log::debug!("Cannot read {} in {}: {}", ty, owner.id(), e);
                None
            }
        };
        self.cache.lock().insert(key, info.clone());
        info
    }
}

//! A monotonic name -> compact numeric id interner, grounded in
//! `AttributeIds`/`DefaultAttribute` (`valdi/runtime/Attributes/AttributeIds.hpp`).
//! Ids are stable for the lifetime of the process once assigned.

use std::sync::{Mutex, OnceLock};

use rustc_hash::FxHashMap;

/// A compact, process-stable id for an attribute name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(u32);

/// Reserved slots for the names every view class binds, matching
/// `DefaultAttribute`'s enum order one-for-one so the fixed ids never shift
/// across a process's lifetime.
pub const RESERVED_NAMES: &[&str] = &[
    "id",
    "elementTag",
    "class",
    "style",
    "translationX",
    "translationY",
    "contentOffsetX",
    "contentOffsetY",
    "lazyLayout",
    "value",
    "placeholder",
    "src",
    "opacity",
    "enabled",
    "accessibilityId",
];

struct Interner {
    names: Vec<String>,
    id_for_name: FxHashMap<String, AttributeId>,
}

impl Interner {
    fn new() -> Self {
        let mut interner = Self {
            names: Vec::new(),
            id_for_name: FxHashMap::default(),
        };
        for name in RESERVED_NAMES {
            interner.intern(name);
        }
        interner
    }

    fn intern(&mut self, name: &str) -> AttributeId {
        if let Some(&id) = self.id_for_name.get(name) {
            return id;
        }
        let id = AttributeId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.id_for_name.insert(name.to_string(), id);
        id
    }

    fn name(&self, id: AttributeId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }
}

/// Guards registration; lookups after warm-up only need the read path
/// (spec.md §5's "lock-free after warm-up" is approximated here by keeping
/// the critical section to a single hash lookup).
pub struct AttributeIds {
    interner: Mutex<Interner>,
}

impl Default for AttributeIds {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeIds {
    pub fn new() -> Self {
        Self {
            interner: Mutex::new(Interner::new()),
        }
    }

    pub fn id_for_name(&self, name: &str) -> AttributeId {
        self.interner.lock().unwrap().intern(name)
    }

    pub fn ids_for_names(&self, names: &[&str]) -> Vec<AttributeId> {
        names.iter().map(|name| self.id_for_name(name)).collect()
    }

    pub fn name_for_id(&self, id: AttributeId) -> Option<String> {
        self.interner.lock().unwrap().name(id).map(String::from)
    }
}

static GLOBAL: OnceLock<AttributeIds> = OnceLock::new();

/// The process-wide interner (spec.md §4.9.1: "a process-wide monotonic
/// interner"). Tests that want isolated ids should construct their own
/// `AttributeIds` instead.
pub fn global() -> &'static AttributeIds {
    GLOBAL.get_or_init(AttributeIds::new)
}

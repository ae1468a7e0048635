//! Flat C names for methods and types.
//!
//! # Scheme
//!
//! ```text
//! <SimpleType>_<method>[_<codes>]
//! ```
//!
//! The `_<codes>` suffix (one letter per parameter, see
//! [`CTypeMapper::type_code`](crate::ctypes)) is only added when the
//! declaring type has several methods of that name. When the candidate is
//! already taken by another method it escalates to the qualified type name,
//! then to a numeric suffix, so the mapping stays injective.
//!
//! | Method | Name |
//! |--------|------|
//! | `vm.GC.collect()` | `GC_collect` |
//! | `vm.GC.mark(int)` overloaded | `GC_mark_I` |
//! | `other.GC.collect()` after the first | `other_GC_collect` |

use rustc_hash::{FxHashMap, FxHashSet};
use sieve_ir::{MethodId, Program};
use tracing::debug;

use crate::ctypes::CTypeMapper;
use crate::TargetProfile;

/// C identifier for a qualified type name: `.` and `$` become `_`.
pub fn type_ident(qualified: &str) -> String {
    qualified
        .chars()
        .map(|c| if c == '.' || c == '$' { '_' } else { c })
        .collect()
}

/// Assigns function names. Once assigned, a name never changes.
pub struct Mangler<'a> {
    program: &'a Program,
    types: CTypeMapper<'a>,
    names: FxHashMap<MethodId, String>,
    taken: FxHashSet<String>,
}

impl<'a> Mangler<'a> {
    pub fn new(program: &'a Program, profile: &'a TargetProfile) -> Self {
        Mangler {
            program,
            types: CTypeMapper::new(program, profile),
            names: FxHashMap::default(),
            taken: FxHashSet::default(),
        }
    }

    /// Fix the name of a root exported under an explicit name.
    ///
    /// Returns `false`, leaving `method` unnamed, when `name` is already
    /// taken.
    pub fn export(&mut self, method: MethodId, name: &str) -> bool {
        if !self.taken.insert(name.to_owned()) {
            debug!(name, "exported name already taken");
            return false;
        }
        self.names.insert(method, name.to_owned());
        true
    }

    /// Name of `method`, assigning one on first request.
    pub fn function_name(&mut self, method: MethodId) -> String {
        if let Some(name) = self.names.get(&method) {
            return name.clone();
        }
        let name = self.assign(method);
        self.taken.insert(name.clone());
        self.names.insert(method, name.clone());
        name
    }

    /// Name of `method` if one was assigned.
    pub fn get(&self, method: MethodId) -> Option<&str> {
        self.names.get(&method).map(String::as_str)
    }

    fn assign(&self, method: MethodId) -> String {
        let symbol = self.program.method(method);
        let class = self.program.class(symbol.owner);
        let suffix = self.suffix(method);

        let candidate = format!("{}{suffix}", type_ident(class.simple_name()));
        if !self.taken.contains(&candidate) {
            return candidate;
        }
        let qualified = format!("{}{suffix}", type_ident(&class.name));
        debug!(%candidate, %qualified, "name collision, using qualified type name");
        if !self.taken.contains(&qualified) {
            return qualified;
        }
        (2u32..)
            .map(|n| format!("{qualified}_{n}"))
            .find(|name| !self.taken.contains(name))
            .unwrap_or(qualified)
    }

    /// `_<method>` plus type codes when overloaded.
    fn suffix(&self, method: MethodId) -> String {
        let symbol = self.program.method(method);
        let mut suffix = format!("_{}", symbol.name);
        if self.program.is_overloaded(method) && !symbol.params.is_empty() {
            suffix.push('_');
            suffix.extend(self.program.param_types(method).map(|ty| self.types.type_code(ty)));
        }
        suffix
    }
}

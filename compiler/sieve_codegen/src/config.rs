//! Target profile: the immutable description of the runtime the generated C
//! links against.
//!
//! Built once per run (from [`TargetProfile::default`] or a JSON profile) and
//! passed by reference to every component.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sieve_collect::DEFAULT_MARKER;

/// Names of runtime accessors referenced by generated code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeNames {
    /// `Address <class_of>(Address object)`: class of an object.
    pub class_of: String,
    /// `int <class_id>(Address klass)`: numeric id of a class.
    pub class_id: String,
    /// Expression yielding the bootstrap suite object.
    pub bootstrap_suite: String,
    /// `Address <suite_classes>(Address suite)`: class table of a suite.
    pub suite_classes: String,
    /// `Address <class_objects>(Address klass)`: constant objects of a class.
    pub class_objects: String,
    /// Body expression of `Array_length`, in terms of `oop`.
    pub array_length: String,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        RuntimeNames {
            class_of: "getClass".to_owned(),
            class_id: "vm_Klass_id".to_owned(),
            bootstrap_suite: "vm_ObjectMemory_root(aload_o(vm_GC_readOnlyObjectMemories, 0))"
                .to_owned(),
            suite_classes: "vm_Suite_classes".to_owned(),
            class_objects: "vm_Klass_objects".to_owned(),
            array_length: "(int)(getUWord(oop, HDR_length) >> 2)".to_owned(),
        }
    }
}

/// Configuration of one translation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    /// Directive marker in documentation comments.
    pub marker: String,
    /// Raw low-level value types: qualified source name to C type name.
    /// Values of these types are never null-checked.
    pub type_substitutions: BTreeMap<String, String>,
    /// Locals whose names clash with runtime globals, and their C names.
    pub local_renames: BTreeMap<String, String>,
    /// Qualified-name prefix of the types whose constants are annotated with
    /// their symbolic name when inlined.
    pub constant_namespace: String,
    /// Qualified name of the marker interface for types whose static fields
    /// are runtime globals.
    pub global_fields_marker: String,
    pub runtime: RuntimeNames,
    /// Emit `#line` markers before each definition.
    pub line_markers: bool,
    /// Replace null and bounds checks with no-op macros.
    pub omit_runtime_checks: bool,
}

impl Default for TargetProfile {
    fn default() -> Self {
        let type_substitutions = [
            ("vm.Address", "Address"),
            ("vm.Offset", "Offset"),
            ("vm.UWord", "UWord"),
        ];
        let local_renames = ["memory", "ip", "fp", "sp", "bc"];
        TargetProfile {
            marker: DEFAULT_MARKER.to_owned(),
            type_substitutions: type_substitutions
                .into_iter()
                .map(|(from, to)| (from.to_owned(), to.to_owned()))
                .collect(),
            local_renames: local_renames
                .into_iter()
                .map(|name| (name.to_owned(), format!("_{name}")))
                .collect(),
            constant_namespace: "vm.".to_owned(),
            global_fields_marker: "vm.pragma.GlobalStaticFields".to_owned(),
            runtime: RuntimeNames::default(),
            line_markers: false,
            omit_runtime_checks: false,
        }
    }
}

impl TargetProfile {
    /// C name of a raw value type, if `qualified` is one.
    pub fn substitute(&self, qualified: &str) -> Option<&str> {
        self.type_substitutions.get(qualified).map(String::as_str)
    }

    /// C name of a local or parameter.
    pub fn local_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.local_renames.get(name).map_or(name, String::as_str)
    }
}

use super::{Method, Subsignature};
use crate::prelude::*;

/// A class or interface of the program.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Class {
    /// The (fully qualified) name of the class.
    pub name: String,
    /// The direct superclass. Only `None` for the root of the class hierarchy and for interfaces.
    #[serde(default)]
    pub super_class: Option<String>,
    /// The directly implemented interfaces of a class,
    /// resp. the directly extended interfaces of an interface.
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Whether this is an interface.
    #[serde(default)]
    pub is_interface: bool,
    /// The methods declared in the class.
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Class {
    /// Return the method with the given subsignature if the class declares one.
    pub fn get_declared_method(&self, subsignature: &Subsignature) -> Option<&Method> {
        self.methods
            .iter()
            .find(|method| &method.subsignature == subsignature)
    }
}

/// The interface through which analyses query the class hierarchy of a program.
///
/// Only direct relations are provided, transitive relations have to be computed by the caller.
/// All methods accept arbitrary class names and return empty results for unknown classes.
pub trait ClassHierarchy {
    /// Return the direct superclass of the given class.
    fn get_super_class(&self, class: &str) -> Option<&str>;

    /// Return the classes directly extending the given class.
    fn get_direct_subclasses_of(&self, class: &str) -> &[String];

    /// Return the interfaces directly extending the given interface.
    fn get_direct_subinterfaces_of(&self, interface: &str) -> &[String];

    /// Return the (non-interface) classes directly implementing the given interface.
    fn get_direct_implementors_of(&self, interface: &str) -> &[String];

    /// Return the method with the given subsignature declared in the given class (if one exists).
    /// Inherited methods are not returned.
    fn get_declared_method(&self, class: &str, subsignature: &Subsignature) -> Option<&Method>;

    /// Returns `true` if the given class is an interface.
    fn is_interface(&self, class: &str) -> bool;
}

#[cfg(test)]
impl Class {
    /// Create a mock class with the given superclass and methods.
    pub fn mock(name: &str, super_class: Option<&str>, methods: Vec<Method>) -> Class {
        Class {
            name: name.to_string(),
            super_class: super_class.map(|class| class.to_string()),
            interfaces: Vec::new(),
            is_interface: false,
            methods,
        }
    }

    /// Create a mock interface extending the given interfaces.
    pub fn mock_interface(name: &str, super_interfaces: &[&str], methods: Vec<Method>) -> Class {
        Class {
            name: name.to_string(),
            super_class: None,
            interfaces: super_interfaces.iter().map(|name| name.to_string()).collect(),
            is_interface: true,
            methods,
        }
    }

    /// Add implemented interfaces to a mock class.
    pub fn implementing(mut self, interfaces: &[&str]) -> Class {
        self.interfaces = interfaces.iter().map(|name| name.to_string()).collect();
        self
    }
}

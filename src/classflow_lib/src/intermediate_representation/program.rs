use super::*;
use crate::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

/// The subsignature of the conventional program entry point.
pub const MAIN_SUBSIGNATURE: &str = "void main(java.lang.String[])";

/// The whole program: all classes together with their methods.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct Program {
    /// The classes of the program, indexed by their name.
    pub classes: BTreeMap<String, Class>,
    /// The entry method of the program.
    /// If not set, a static `main` method is searched for.
    #[serde(default)]
    pub entry_method: Option<MethodRef>,
}

impl Program {
    /// Deserialize a program from its JSON representation and check that it is well-formed.
    pub fn from_json(json: &str) -> Result<Program, Error> {
        let program: Program =
            serde_json::from_str(json).context("Could not parse the program file")?;
        program.validate()?;
        Ok(program)
    }

    /// Return the method identified by the given reference.
    pub fn get_method(&self, method: &MethodRef) -> Option<&Method> {
        self.classes
            .get(&method.declaring_class)?
            .get_declared_method(&method.subsignature)
    }

    /// Iterate over all methods of all classes.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.classes.values().flat_map(|class| class.methods.iter())
    }

    /// Return the entry method of the program.
    ///
    /// This is the explicitly configured entry method if one is set.
    /// Otherwise it is the static `main` method if exactly one class declares one.
    pub fn main_method(&self) -> Option<MethodRef> {
        if let Some(entry) = &self.entry_method {
            return Some(entry.clone());
        }
        let mut candidates = self
            .methods()
            .filter(|method| method.is_static && method.subsignature.as_str() == MAIN_SUBSIGNATURE);
        match (candidates.next(), candidates.next()) {
            (Some(main), None) => Some(main.get_ref()),
            _ => None,
        }
    }

    /// Check that the program is well-formed.
    ///
    /// A program is well-formed if all class names referenced in the hierarchy exist,
    /// superclasses are classes and implemented interfaces are interfaces,
    /// methods are declared at most once per class,
    /// abstract methods have no body, all branch targets are valid statement indices
    /// and the entry method (if set) exists and is not abstract.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, class) in self.classes.iter() {
            if *name != class.name {
                return Err(anyhow!("Class {} is stored under the name {}", class.name, name));
            }
            if let Some(super_class) = &class.super_class {
                match self.classes.get(super_class) {
                    None => return Err(anyhow!("Unknown superclass {} of {}", super_class, name)),
                    Some(super_class) if super_class.is_interface => {
                        return Err(anyhow!(
                            "Superclass {} of {} is an interface",
                            super_class.name,
                            name
                        ))
                    }
                    Some(_) => (),
                }
                if class.is_interface {
                    return Err(anyhow!("Interface {} has a superclass", name));
                }
            }
            for interface in class.interfaces.iter() {
                match self.classes.get(interface) {
                    Some(interface) if interface.is_interface => (),
                    _ => return Err(anyhow!("{} implements unknown interface {}", name, interface)),
                }
            }
            let mut subsignatures = HashSet::new();
            for method in class.methods.iter() {
                validate_method(class, method)
                    .with_context(|| format!("Malformed method {}", method))?;
                if !subsignatures.insert(&method.subsignature) {
                    return Err(anyhow!("Method {} is declared more than once", method));
                }
            }
        }
        for name in self.classes.keys() {
            self.check_acyclic(name)?;
        }
        if let Some(entry) = &self.entry_method {
            match self.get_method(entry) {
                Some(method) if !method.is_abstract => (),
                _ => return Err(anyhow!("Entry method {} does not exist", entry)),
            }
        }
        Ok(())
    }
}

impl Program {
    /// Check that no class is its own (transitive) superclass or super-interface.
    fn check_acyclic(&self, class: &str) -> Result<(), Error> {
        let mut visited = HashSet::new();
        let mut stack = vec![class];
        while let Some(current) = stack.pop() {
            let current = match self.classes.get(current) {
                Some(current) => current,
                None => continue,
            };
            for parent in current.super_class.iter().chain(current.interfaces.iter()) {
                if parent == class {
                    return Err(anyhow!("Cyclic class hierarchy at {}", class));
                }
                if visited.insert(parent.as_str()) {
                    stack.push(parent.as_str());
                }
            }
        }
        Ok(())
    }
}

/// Check the consistency of a single method declaration.
fn validate_method(class: &Class, method: &Method) -> Result<(), Error> {
    if method.declaring_class != class.name {
        return Err(anyhow!(
            "Method declared in {} names {} as its declaring class",
            class.name,
            method.declaring_class
        ));
    }
    if method.is_abstract && !method.body.is_empty() {
        return Err(anyhow!("Abstract method has a body"));
    }
    for (index, stmt) in method.body.iter().enumerate() {
        for target in stmt.jump_targets() {
            if target >= method.body.len() {
                return Err(anyhow!(
                    "Statement {} jumps to nonexisting statement {}",
                    index,
                    target
                ));
            }
        }
    }
    Ok(())
}

/// The class hierarchy of a program.
///
/// The inverse relations (subclasses, sub-interfaces, implementors)
/// are computed once when the hierarchy is created.
pub struct ProgramHierarchy<'a> {
    program: &'a Program,
    subclasses: HashMap<&'a str, Vec<String>>,
    subinterfaces: HashMap<&'a str, Vec<String>>,
    implementors: HashMap<&'a str, Vec<String>>,
}

impl<'a> ProgramHierarchy<'a> {
    /// Compute the class hierarchy of the given program.
    pub fn new(program: &'a Program) -> ProgramHierarchy<'a> {
        let mut hierarchy = ProgramHierarchy {
            program,
            subclasses: HashMap::new(),
            subinterfaces: HashMap::new(),
            implementors: HashMap::new(),
        };
        for class in program.classes.values() {
            if let Some(super_class) = &class.super_class {
                hierarchy
                    .subclasses
                    .entry(super_class.as_str())
                    .or_default()
                    .push(class.name.clone());
            }
            let inverse_relation = if class.is_interface {
                &mut hierarchy.subinterfaces
            } else {
                &mut hierarchy.implementors
            };
            for interface in class.interfaces.iter() {
                inverse_relation
                    .entry(interface.as_str())
                    .or_default()
                    .push(class.name.clone());
            }
        }
        hierarchy
    }
}

impl<'a> ClassHierarchy for ProgramHierarchy<'a> {
    fn get_super_class(&self, class: &str) -> Option<&str> {
        self.program.classes.get(class)?.super_class.as_deref()
    }

    fn get_direct_subclasses_of(&self, class: &str) -> &[String] {
        self.subclasses.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    fn get_direct_subinterfaces_of(&self, interface: &str) -> &[String] {
        self.subinterfaces
            .get(interface)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn get_direct_implementors_of(&self, interface: &str) -> &[String] {
        self.implementors
            .get(interface)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn get_declared_method(&self, class: &str, subsignature: &Subsignature) -> Option<&Method> {
        self.program
            .classes
            .get(class)?
            .get_declared_method(subsignature)
    }

    fn is_interface(&self, class: &str) -> bool {
        self.program
            .classes
            .get(class)
            .map(|class| class.is_interface)
            .unwrap_or(false)
    }
}

#[cfg(test)]
impl Program {
    /// Create a mock program from the given classes.
    pub fn mock(classes: Vec<Class>, entry_method: Option<MethodRef>) -> Program {
        Program {
            classes: classes
                .into_iter()
                .map(|class| (class.name.clone(), class))
                .collect(),
            entry_method,
        }
    }
}

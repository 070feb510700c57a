use super::*;
use crate::stmts;

fn static_method(class: &str, subsignature: &str, params: &[&str], body: Vec<Stmt>) -> Method {
    Method {
        is_static: true,
        ..Method::mock(class, subsignature, params, body)
    }
}

/// Classes: `A <- B <- C`, `A <- D`, `A <- E` where `E` redeclares `foo` as abstract.
/// Interfaces: `I <- J`, `K` implements `J`, `L` implements `I`, `M` extends `K`.
fn mock_program() -> Program {
    Program::mock(
        vec![
            Class::mock("Object", None, vec![]),
            Class::mock("A", Some("Object"), vec![Method::mock("A", "void foo()", &[], stmts!["return"])]),
            Class::mock("B", Some("A"), vec![Method::mock("B", "void foo()", &[], stmts!["return"])]),
            Class::mock("C", Some("B"), vec![]),
            Class::mock("D", Some("A"), vec![]),
            Class::mock("E", Some("A"), vec![Method::mock_abstract("E", "void foo()", &[])]),
            Class::mock_interface("I", &[], vec![Method::mock_abstract("I", "int bar(int)", &["p"])]),
            Class::mock_interface("J", &["I"], vec![]),
            Class::mock(
                "K",
                Some("Object"),
                vec![Method::mock("K", "int bar(int)", &["p"], stmts!["return p"])],
            )
            .implementing(&["J"]),
            Class::mock(
                "L",
                Some("Object"),
                vec![Method::mock(
                    "L",
                    "int bar(int)",
                    &["p"],
                    stmts!["invokevirtual this:A.<A: void foo()>()", "return p"],
                )],
            )
            .implementing(&["I"]),
            Class::mock("M", Some("K"), vec![]),
            Class::mock(
                "Main",
                Some("Object"),
                vec![
                    static_method(
                        "Main",
                        MAIN_SUBSIGNATURE,
                        &["args:java.lang.String[]"],
                        stmts![
                            "a:A = new B",
                            "invokevirtual a:A.<A: void foo()>()",
                            "invokespecial a:C.<C: void foo()>()",
                            "x = invokeinterface i:I.<I: int bar(int)>(x)",
                            "invokestatic <Main: void helper()>()",
                            "invokestatic <Main: void missing()>()",
                            "invokestatic <Main: void two(int,int)>(x)",
                            "return"
                        ],
                    ),
                    static_method(
                        "Main",
                        "void helper()",
                        &[],
                        stmts!["invokestatic <Main: void helper()>()", "return"],
                    ),
                    static_method("Main", "void two(int,int)", &["p", "q"], stmts!["return"]),
                    static_method("Main", "void unused()", &[], stmts!["return"]),
                ],
            ),
        ],
        None,
    )
}

fn refs(methods: Vec<&Method>) -> Vec<String> {
    let mut refs: Vec<String> = methods.into_iter().map(|method| method.to_string()).collect();
    refs.sort();
    refs
}

#[test]
fn dispatch_walks_up_the_superclass_chain() {
    let program = mock_program();
    let hierarchy = ProgramHierarchy::new(&program);
    let foo = Subsignature::new("void foo()");
    assert_eq!(dispatch(&hierarchy, "C", &foo).unwrap().declaring_class, "B");
    assert_eq!(dispatch(&hierarchy, "D", &foo).unwrap().declaring_class, "A");
    // abstract declarations are skipped
    assert_eq!(dispatch(&hierarchy, "E", &foo).unwrap().declaring_class, "A");
    assert!(dispatch(&hierarchy, "Object", &foo).is_none());
    assert!(dispatch(&hierarchy, "Unknown", &foo).is_none());
    assert!(dispatch(&hierarchy, "I", &Subsignature::new("int bar(int)")).is_none());
}

#[test]
fn resolve_by_call_kind() {
    let program = mock_program();
    let hierarchy = ProgramHierarchy::new(&program);
    let main = program
        .get_method(&MethodRef::new("Main", MAIN_SUBSIGNATURE))
        .unwrap();
    let targets: Vec<Vec<String>> = main
        .call_sites()
        .map(|(_, invoke)| refs(resolve(&hierarchy, invoke)))
        .collect();
    assert_eq!(
        targets,
        vec![
            vec!["<A: void foo()>".to_string(), "<B: void foo()>".to_string()],
            vec!["<B: void foo()>".to_string()],
            vec!["<K: int bar(int)>".to_string(), "<L: int bar(int)>".to_string()],
            vec!["<Main: void helper()>".to_string()],
            vec![],
            vec!["<Main: void two(int,int)>".to_string()],
        ]
    );
}

#[test]
fn virtual_call_from_subclass() {
    let program = mock_program();
    let hierarchy = ProgramHierarchy::new(&program);
    let invoke = Invoke {
        result: None,
        kind: CallKind::Virtual,
        method_ref: MethodRef::new("B", "void foo()"),
        receiver: Some(crate::variable!("b:B")),
        args: Vec::new(),
    };
    assert_eq!(refs(resolve(&hierarchy, &invoke)), vec!["<B: void foo()>"]);
}

#[test]
fn cha_call_graph() {
    let program = mock_program();
    let hierarchy = ProgramHierarchy::new(&program);
    let main_ref = MethodRef::new("Main", MAIN_SUBSIGNATURE);
    let main = program.get_method(&main_ref).unwrap();
    let (call_graph, logs) = build_cha_call_graph(&hierarchy, main);

    assert_eq!(
        refs(call_graph.reachable_methods().collect()),
        vec![
            "<A: void foo()>",
            "<B: void foo()>",
            "<K: int bar(int)>",
            "<L: int bar(int)>",
            "<Main: void helper()>",
            "<Main: void main(java.lang.String[])>",
        ]
    );
    assert_eq!(refs(call_graph.entry_methods().collect()), vec![main.to_string()]);
    assert!(!call_graph.contains(&MethodRef::new("Main", "void unused()")));
    assert!(!call_graph.contains(&MethodRef::new("Main", "void two(int,int)")));
    // main: 2 + 1 + 2 + 1, L.bar: 2, helper: 1
    assert_eq!(call_graph.edge_count(), 9);
    for (caller, edge, _) in call_graph.edges() {
        assert_eq!(caller.body[edge.call_site].as_invoke(), Some(edge.invoke));
    }
    assert_eq!(
        refs(call_graph.get_callees_of_call_site(&main_ref, 1)),
        vec!["<A: void foo()>", "<B: void foo()>"]
    );
    assert!(call_graph.get_callees_of_call_site(&main_ref, 5).is_empty());
    assert_eq!(call_graph.get_callees_of(&main_ref).len(), 5);

    let helper_ref = MethodRef::new("Main", "void helper()");
    let mut callers: Vec<(String, usize)> = call_graph
        .get_callers_of(&helper_ref)
        .into_iter()
        .map(|(caller, call_site)| (caller.to_string(), call_site))
        .collect();
    callers.sort();
    assert_eq!(
        callers,
        vec![
            ("<Main: void helper()>".to_string(), 0),
            (main.to_string(), 4),
        ]
    );

    // the call with the wrong number of arguments is rejected
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].location, Some(Location::stmt(main_ref, 6)));
}

#[test]
fn duplicate_edges_are_absorbed() {
    let caller = Method::mock(
        "A",
        "void f()",
        &[],
        stmts!["invokestatic <A: int g(int)>(x)", "return"],
    );
    let callee = Method::mock("A", "int g(int)", &["p"], stmts!["return p"]);
    let mut call_graph = CallGraph::new();
    call_graph.add_entry_method(&caller);
    assert!(call_graph.add_edge(&caller, 0, &callee).unwrap());
    assert!(!call_graph.add_edge(&caller, 0, &callee).unwrap());
    assert_eq!(call_graph.edge_count(), 1);
    assert_eq!(call_graph.reachable_methods().count(), 2);
}

#[test]
fn malformed_edges_are_rejected() {
    let caller = Method::mock(
        "A",
        "void f()",
        &[],
        stmts!["invokestatic <A: int g(int)>(x)", "return"],
    );
    let callee = Method::mock("A", "int g(int,int)", &["p", "q"], stmts!["return p"]);
    let mut call_graph = CallGraph::new();
    assert!(call_graph.add_edge(&caller, 0, &callee).is_err());
    assert!(call_graph.add_edge(&caller, 1, &callee).is_err());
    assert!(call_graph.add_edge(&caller, 7, &callee).is_err());
    assert_eq!(call_graph.edge_count(), 0);
    assert!(!call_graph.contains(&callee.get_ref()));
}

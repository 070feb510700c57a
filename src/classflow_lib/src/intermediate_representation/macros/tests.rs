use crate::intermediate_representation::*;

#[test]
fn test_var() {
    assert_eq!(variable!("x"), Variable::new("x", Type::Int));
    assert_eq!(variable!("c:char"), Variable::new("c", Type::Char));
    assert_eq!(
        variable!("args:java.lang.String[]"),
        Variable::new("args", Type::Reference("java.lang.String[]".into()))
    );
}

#[test]
#[should_panic]
fn var_empty_panics() {
    variable!("");
}

#[test]
#[should_panic]
fn var_leading_digit_panics() {
    variable!("1x");
}

#[test]
fn test_expr_literals() {
    assert_eq!(expr!("-3"), Expression::IntLiteral(-3));
    assert_eq!(expr!("null"), Expression::OtherLiteral("null".into()));
    assert_eq!(expr!("10L"), Expression::OtherLiteral("10L".into()));
    assert_eq!(expr!("\"hi\""), Expression::OtherLiteral("\"hi\"".into()));
}

#[test]
fn test_expr_bin_op() {
    assert_eq!(
        expr!("x >>> 2"),
        Expression::bin_op(
            BinOpType::Ushr,
            Expression::Var(variable!("x")),
            Expression::IntLiteral(2)
        )
    );
    assert_eq!(
        expr!("x - -1"),
        Expression::bin_op(
            BinOpType::Sub,
            Expression::Var(variable!("x")),
            Expression::IntLiteral(-1)
        )
    );
    assert_eq!(
        expr!("a != b"),
        Expression::bin_op(
            BinOpType::Ne,
            Expression::Var(variable!("a")),
            Expression::Var(variable!("b"))
        )
    );
}

#[test]
fn test_expr_heap_accesses() {
    assert_eq!(
        expr!("o.f"),
        Expression::InstanceField {
            base: variable!("o"),
            field: "f".into()
        }
    );
    assert_eq!(
        expr!("Config.limit"),
        Expression::StaticField {
            class: "Config".into(),
            field: "limit".into()
        }
    );
    assert_eq!(expr!("a.length"), Expression::ArrayLength(variable!("a")));
    assert_eq!(
        expr!("a[i]"),
        Expression::ArrayAccess {
            base: variable!("a"),
            index: variable!("i")
        }
    );
    assert_eq!(expr!("new A"), Expression::New("A".into()));
    assert_eq!(
        expr!("(B) o:A"),
        Expression::Cast {
            ty: Type::Reference("B".into()),
            arg: variable!("o:A")
        }
    );
    assert_eq!(
        expr!("-x"),
        Expression::Neg(Box::new(Expression::Var(variable!("x"))))
    );
}

#[test]
#[should_panic]
fn expr_nested_panics() {
    expr!("a + b + c");
}

#[test]
fn test_stmt_assign_and_store() {
    assert_eq!(
        stmt!("x = y"),
        Stmt::Assign {
            var: variable!("x"),
            value: Expression::Var(variable!("y"))
        }
    );
    assert_eq!(
        stmt!("a[i] = v"),
        Stmt::Store {
            target: expr!("a[i]"),
            value: variable!("v")
        }
    );
}

#[test]
fn test_stmt_control_flow() {
    assert_eq!(stmt!("nop"), Stmt::Nop);
    assert_eq!(stmt!("return"), Stmt::Return(None));
    assert_eq!(stmt!("return x"), Stmt::Return(Some(variable!("x"))));
    assert_eq!(stmt!("throw e:E"), Stmt::Throw(variable!("e:E")));
    assert_eq!(
        stmt!("if x == 0 goto 5"),
        Stmt::If {
            condition: expr!("x == 0"),
            target: 5
        }
    );
    assert_eq!(
        stmt!("switch k -1:2 7:4 default:6"),
        Stmt::Switch {
            var: variable!("k"),
            cases: vec![(-1, 2), (7, 4)],
            default: 6
        }
    );
}

#[test]
fn test_stmt_invoke() {
    assert_eq!(
        stmt!("invokestatic <Util: void log()>()"),
        Stmt::Invoke(Invoke {
            result: None,
            kind: CallKind::Static,
            method_ref: MethodRef::new("Util", "void log()"),
            receiver: None,
            args: Vec::new(),
        })
    );
    assert_eq!(
        stmt!("r = invokeinterface list:java.util.List.<java.util.List: int size()>()"),
        Stmt::Invoke(Invoke {
            result: Some(variable!("r")),
            kind: CallKind::Interface,
            method_ref: MethodRef::new("java.util.List", "int size()"),
            receiver: Some(variable!("list:java.util.List")),
            args: Vec::new(),
        })
    );
    let body = stmts![
        "o = new A",
        "invokespecial o.<A: void <init>(int)>(x)",
        "return",
    ];
    assert_eq!(body.len(), 3);
    assert_eq!(
        body[1].as_invoke().unwrap().method_ref.subsignature.as_str(),
        "void <init>(int)"
    );
}

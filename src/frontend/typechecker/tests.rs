//! Typechecker unit tests.

use super::*;
use crate::config::CheckerConfig;
use crate::frontend::diagnostics::ErrorKind;
use wren_syntax::build::*;

fn check_program_with(program: &Program, config: CheckerConfig) -> Result<TypeChecker, CompileError> {
    let mut checker = TypeChecker::new().with_config(config);
    checker.check_program(program)?;
    Ok(checker)
}

fn check(statements: Vec<Spanned<Stmt>>) -> Result<TypeChecker, CompileError> {
    check_program_with(&program(statements), CheckerConfig::default())
}

fn error_kind(statements: Vec<Spanned<Stmt>>) -> ErrorKind {
    check(statements).err().expect("expected a type error").kind
}

fn fib_program() -> Vec<Spanned<Stmt>> {
    vec![
        multi("fib", &[("n", "Int")], Some("Int")),
        function_stmt(named_func(
            "fib",
            vec![param("n", None)],
            None,
            Some(binary(ident("n"), BinaryOp::Lt, int(2))),
            vec![return_(Some(ident("n")))],
        )),
        function_stmt(named_func(
            "fib",
            vec![param("n", None)],
            None,
            None,
            vec![return_(Some(binary(
                call("fib", vec![binary(ident("n"), BinaryOp::Sub, int(1))]),
                BinaryOp::Add,
                call("fib", vec![binary(ident("n"), BinaryOp::Sub, int(2))]),
            )))],
        )),
        let_("r", Some("Int"), Some(call("fib", vec![int(10)]))),
    ]
}

// ========================================
// Declarations
// ========================================

#[test]
fn test_let_infers_literal_type() {
    let program = program(vec![let_("x", None, Some(int(1)))]);
    let checker = check_program_with(&program, CheckerConfig::default()).unwrap();
    let ty = checker.type_info().node_type(program.statements[0].id).unwrap();
    assert!(ty.is_instance());
    assert_eq!(ty.to_string(), "Int");
}

#[test]
fn test_declared_type_mismatch() {
    assert_eq!(
        error_kind(vec![let_("x", Some("Int"), Some(string("a")))]),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn test_unknown_symbol() {
    assert_eq!(error_kind(vec![let_("x", None, Some(ident("y")))]), ErrorKind::NameResolution);
}

#[test]
fn test_type_name_is_not_a_value_annotation() {
    let err = check(vec![let_("x", None, Some(int(1))), let_("y", Some("x"), None)])
        .err()
        .unwrap();
    assert_eq!(err.kind, ErrorKind::InvalidExpression);
}

#[test]
fn test_first_assignment_fixes_untyped_var() {
    assert!(check(vec![var_("x", None, None), assign("x", &[], AssignOp::Assign, int(1))]).is_ok());
    assert_eq!(
        error_kind(vec![
            var_("x", None, None),
            assign("x", &[], AssignOp::Assign, int(1)),
            assign("x", &[], AssignOp::Assign, string("s")),
        ]),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn test_assign_to_undeclared() {
    assert_eq!(
        error_kind(vec![assign("x", &[], AssignOp::Assign, int(1))]),
        ErrorKind::NameResolution
    );
}

#[test]
fn test_unfilled_unknown_cannot_be_read() {
    assert_eq!(
        error_kind(vec![var_("x", None, None), let_("y", None, Some(ident("x")))]),
        ErrorKind::UnresolvedType
    );
}

// ========================================
// Functions and return inference
// ========================================

#[test]
fn test_inferred_return_type() {
    let f = func(
        vec![param("a", Some("Int"))],
        None,
        vec![return_(Some(binary(ident("a"), BinaryOp::Add, int(1))))],
    );
    let program = program(vec![
        let_("f", None, Some(function_expr(f))),
        let_("y", Some("Int"), Some(call("f", vec![int(2)]))),
    ]);
    let checker = check_program_with(&program, CheckerConfig::default()).unwrap();
    let ty = checker.type_info().node_type(program.statements[0].id).unwrap();
    assert_eq!(ty.to_string(), "(Int) -> Int");
}

#[test]
fn test_empty_function_returns_void() {
    let program = program(vec![let_("f", None, Some(function_expr(func(vec![], None, vec![]))))]);
    let checker = check_program_with(&program, CheckerConfig::default()).unwrap();
    let ty = checker.type_info().node_type(program.statements[0].id).unwrap();
    assert_eq!(ty.to_string(), "() -> Void");
}

#[test]
fn test_too_many_return_types() {
    let f = func(
        vec![param("a", Some("Int"))],
        None,
        vec![
            if_(binary(ident("a"), BinaryOp::Lt, int(1)), vec![return_(Some(int(1)))], vec![], None),
            return_(Some(string("s"))),
        ],
    );
    assert_eq!(
        error_kind(vec![let_("f", None, Some(function_expr(f)))]),
        ErrorKind::TooManyReturnTypes
    );
}

#[test]
fn test_else_if_returns_are_collected() {
    let f = func(
        vec![param("a", Some("Int"))],
        None,
        vec![if_(
            binary(ident("a"), BinaryOp::Lt, int(1)),
            vec![return_(Some(int(1)))],
            vec![(binary(ident("a"), BinaryOp::Lt, int(2)), vec![return_(Some(boolean(true)))])],
            None,
        )],
    );
    assert_eq!(
        error_kind(vec![let_("f", None, Some(function_expr(f)))]),
        ErrorKind::TooManyReturnTypes
    );
}

#[test]
fn test_declared_return_mismatch() {
    let f = func(vec![], Some("Int"), vec![return_(Some(string("s")))]);
    assert_eq!(
        error_kind(vec![let_("f", None, Some(function_expr(f)))]),
        ErrorKind::ReturnTypeMismatch
    );
}

#[test]
fn test_second_return_in_block() {
    let f = func(vec![], None, vec![return_(Some(int(1))), return_(Some(int(2)))]);
    assert_eq!(
        error_kind(vec![let_("f", None, Some(function_expr(f)))]),
        ErrorKind::BlockAlreadyReturned
    );
}

#[test]
fn test_parameter_needs_annotation() {
    let f = func(vec![param("a", None)], None, vec![]);
    assert_eq!(
        error_kind(vec![let_("f", None, Some(function_expr(f)))]),
        ErrorKind::MissingAnnotation
    );
}

#[test]
fn test_default_must_match_parameter_type() {
    let f = func(vec![param_with_default("a", Some("Int"), Literal::string("x"))], None, vec![]);
    assert_eq!(
        error_kind(vec![let_("f", None, Some(function_expr(f)))]),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn test_return_count_warning() {
    let mut body: Vec<Spanned<Stmt>> = (1..5)
        .map(|i| if_(binary(ident("a"), BinaryOp::Lt, int(i)), vec![return_(Some(int(i)))], vec![], None))
        .collect();
    body.push(return_(Some(int(0))));
    let statements = vec![let_(
        "f",
        None,
        Some(function_expr(func(vec![param("a", Some("Int"))], None, body))),
    )];

    let program = program(statements);
    let checker = check_program_with(&program, CheckerConfig::default()).unwrap();
    assert_eq!(checker.warnings().len(), 1);

    let relaxed = CheckerConfig::new().with_return_warning_threshold(10);
    let checker = check_program_with(&program, relaxed).unwrap();
    assert!(checker.warnings().is_empty());
}

#[test]
fn test_recursive_let_with_declared_return() {
    let fact = func(
        vec![param("n", Some("Int"))],
        Some("Int"),
        vec![
            if_(binary(ident("n"), BinaryOp::Lt, int(2)), vec![return_(Some(int(1)))], vec![], None),
            return_(Some(binary(
                ident("n"),
                BinaryOp::Mul,
                call("fact", vec![binary(ident("n"), BinaryOp::Sub, int(1))]),
            ))),
        ],
    );
    assert!(check(vec![let_("fact", None, Some(function_expr(fact)))]).is_ok());
}

#[test]
fn test_recursive_let_through_parentheses() {
    let countdown = func(
        vec![param("n", Some("Int"))],
        Some("Int"),
        vec![return_(Some(call("countdown", vec![binary(ident("n"), BinaryOp::Sub, int(1))])))],
    );
    let program = program(vec![let_("countdown", None, Some(group(function_expr(countdown))))]);
    let checker = check_program_with(&program, CheckerConfig::default()).unwrap();
    let ty = checker.type_info().node_type(program.statements[0].id).unwrap();
    assert_eq!(ty.to_string(), "(Int) -> Int");
}

#[test]
fn test_recursive_let_without_return_type_is_unresolved() {
    let fact = func(
        vec![param("n", Some("Int"))],
        None,
        vec![return_(Some(call("fact", vec![ident("n")])))],
    );
    assert_eq!(
        error_kind(vec![let_("fact", None, Some(function_expr(fact)))]),
        ErrorKind::UnresolvedType
    );
}

#[test]
fn test_function_expression_cannot_be_named() {
    let f = named_func("f", vec![], None, None, vec![]);
    assert_eq!(
        error_kind(vec![let_("f", None, Some(function_expr(f)))]),
        ErrorKind::InvalidExpression
    );
}

// ========================================
// Calls and operators
// ========================================

fn identity() -> Spanned<Stmt> {
    let_(
        "id",
        None,
        Some(function_expr(func(
            vec![param("a", Some("Int"))],
            None,
            vec![return_(Some(ident("a")))],
        ))),
    )
}

#[test]
fn test_call_arity_mismatch() {
    assert_eq!(
        error_kind(vec![identity(), let_("x", None, Some(call("id", vec![int(1), int(2)])))]),
        ErrorKind::ArityMismatch
    );
}

#[test]
fn test_call_argument_mismatch() {
    let err = check(vec![identity(), let_("x", None, Some(call("id", vec![string("s")])))])
        .err()
        .unwrap();
    assert_eq!(err.kind, ErrorKind::ArgumentMismatch);
}

#[test]
fn test_raw_type_as_argument() {
    assert_eq!(
        error_kind(vec![identity(), let_("x", None, Some(call("id", vec![ident("Int")])))]),
        ErrorKind::NotAnInstance
    );
}

#[test]
fn test_calling_a_number() {
    assert_eq!(
        error_kind(vec![let_("x", None, Some(int(1))), let_("y", None, Some(call("x", vec![])))]),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn test_comparison_is_boolean() {
    assert!(check(vec![let_("b", Some("Boolean"), Some(binary(int(1), BinaryOp::Lt, int(2))))]).is_ok());
    assert!(check(vec![let_("b", Some("Int"), Some(group(binary(int(1), BinaryOp::Add, int(2)))))]).is_ok());
}

#[test]
fn test_operands_must_match() {
    assert_eq!(
        error_kind(vec![let_("x", None, Some(binary(int(1), BinaryOp::Add, string("a"))))]),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn test_compound_assign_placement() {
    assert_eq!(
        error_kind(vec![let_("x", None, Some(binary(int(1), BinaryOp::AddAssign, int(2))))]),
        ErrorKind::InvalidExpression
    );
    assert_eq!(
        error_kind(vec![var_("x", None, Some(int(1))), binary_stmt(ident("x"), BinaryOp::Mul, int(2))]),
        ErrorKind::InvalidStatement
    );
    assert!(check(vec![var_("x", None, Some(int(1))), binary_stmt(ident("x"), BinaryOp::AddAssign, int(2))]).is_ok());
}

// ========================================
// Control flow
// ========================================

fn counting_loop(body: Vec<Spanned<Stmt>>) -> Spanned<Stmt> {
    for_(
        var_("i", None, Some(int(0))),
        Some(binary(ident("i"), BinaryOp::Lt, int(3))),
        binary_stmt(ident("i"), BinaryOp::AddAssign, int(1)),
        body,
    )
}

#[test]
fn test_for_header_scope() {
    assert!(check(vec![counting_loop(vec![let_("j", None, Some(ident("i")))])]).is_ok());
    assert_eq!(
        error_kind(vec![counting_loop(vec![]), let_("j", None, Some(ident("i")))]),
        ErrorKind::NameResolution
    );
}

#[test]
fn test_for_condition_must_be_boolean() {
    let stmt = for_(
        var_("i", None, Some(int(0))),
        Some(ident("i")),
        binary_stmt(ident("i"), BinaryOp::AddAssign, int(1)),
        vec![],
    );
    assert_eq!(error_kind(vec![stmt]), ErrorKind::TypeMismatch);
}

#[test]
fn test_loop_returns_reach_function() {
    let f = func(
        vec![],
        None,
        vec![
            while_(boolean(true), vec![return_(Some(string("s")))]),
            return_(Some(int(1))),
        ],
    );
    assert_eq!(
        error_kind(vec![let_("f", None, Some(function_expr(f)))]),
        ErrorKind::TooManyReturnTypes
    );
}

#[test]
fn test_block_scope_does_not_leak() {
    assert_eq!(
        error_kind(vec![
            if_(boolean(true), vec![let_("inner", None, Some(int(1)))], vec![], None),
            let_("x", None, Some(ident("inner"))),
        ]),
        ErrorKind::NameResolution
    );
}

// ========================================
// Multi dispatch
// ========================================

#[test]
fn test_multi_registers_implementors_in_order() {
    let program = program(fib_program());
    let checker = check_program_with(&program, CheckerConfig::default()).unwrap();
    let info = checker.type_info();

    let multi = info.multi_type(program.statements[0].id).unwrap();
    let implementors = multi.implementors();
    assert_eq!(implementors.len(), 2);
    assert_eq!(implementors[0].name, "fib_1");
    assert!(implementors[0].guarded);
    assert_eq!(implementors[1].name, "fib_2");
    assert!(!implementors[1].guarded);

    assert!(info.is_multi_member(program.statements[1].id));
    assert_eq!(info.multi_member(program.statements[2].id).unwrap().name, "fib_2");
}

#[test]
fn test_function_statement_needs_multi() {
    let stmt = function_stmt(named_func("lonely", vec![], None, None, vec![]));
    assert_eq!(error_kind(vec![stmt]), ErrorKind::NoAssociatedMulti);
}

#[test]
fn test_multi_in_outer_block_is_not_visible() {
    let stmts = vec![
        multi("f", &[], Some("Int")),
        if_(
            boolean(true),
            vec![function_stmt(named_func("f", vec![], None, None, vec![return_(Some(int(1)))]))],
            vec![],
            None,
        ),
    ];
    assert_eq!(error_kind(stmts), ErrorKind::NoAssociatedMulti);
}

#[test]
fn test_implementor_arity() {
    let stmts = vec![
        multi("f", &[("n", "Int")], Some("Int")),
        function_stmt(named_func("f", vec![], None, None, vec![return_(Some(int(1)))])),
    ];
    assert_eq!(error_kind(stmts), ErrorKind::ArityMismatch);
}

#[test]
fn test_implementor_return_must_match() {
    let stmts = vec![
        multi("f", &[("n", "Int")], Some("Int")),
        function_stmt(named_func("f", vec![param("n", None)], None, None, vec![return_(Some(string("s")))])),
    ];
    assert_eq!(error_kind(stmts), ErrorKind::ReturnTypeMismatch);
}

#[test]
fn test_guard_must_be_boolean() {
    let stmts = vec![
        multi("f", &[("n", "Int")], Some("Int")),
        function_stmt(named_func(
            "f",
            vec![param("n", None)],
            None,
            Some(ident("n")),
            vec![return_(Some(ident("n")))],
        )),
    ];
    assert_eq!(error_kind(stmts), ErrorKind::TypeMismatch);
}

#[test]
fn test_guard_sees_multi_parameter_names() {
    let stmts = vec![
        multi("f", &[("n", "Int")], Some("Int")),
        function_stmt(named_func(
            "f",
            vec![param("m", None)],
            None,
            Some(binary(ident("m"), BinaryOp::Gt, int(0))),
            vec![return_(Some(ident("m")))],
        )),
    ];
    assert_eq!(error_kind(stmts), ErrorKind::NameResolution);
}

#[test]
fn test_multi_needs_return_type() {
    assert_eq!(error_kind(vec![multi("f", &[("n", "Int")], None)]), ErrorKind::MissingAnnotation);
}

// ========================================
// Classes
// ========================================

fn point_class() -> Spanned<Stmt> {
    class(
        "Point",
        vec![
            let_("x", Some("Int"), Some(int(0))),
            var_("y", Some("Int"), None),
            init(
                vec![param("x", Some("Int")), param("y", Some("Int"))],
                vec![
                    assign("this", &["x"], AssignOp::Assign, ident("x")),
                    assign("this", &["y"], AssignOp::Assign, ident("y")),
                ],
            ),
            function_stmt(named_func(
                "sum",
                vec![],
                Some("Int"),
                None,
                vec![return_(Some(binary(
                    chain("this", vec![prop("x")]),
                    BinaryOp::Add,
                    chain("this", vec![prop("y")]),
                )))],
            )),
        ],
    )
}

#[test]
fn test_class_construction_and_method_call() {
    let program = program(vec![
        point_class(),
        let_("p", None, Some(new_("Point", vec![int(1), int(2)]))),
        let_("s", Some("Int"), Some(chain("p", vec![prop("sum"), args(vec![])]))),
    ]);
    let checker = check_program_with(&program, CheckerConfig::default()).unwrap();
    let object = checker.type_info().class_type(program.statements[0].id).unwrap();
    let names: Vec<String> = object.properties().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["x", "y", "sum"]);
    assert_eq!(object.initializers().len(), 1);
}

#[test]
fn test_methods_see_later_methods() {
    let stmts = vec![class(
        "A",
        vec![
            function_stmt(named_func(
                "a",
                vec![],
                Some("Int"),
                None,
                vec![return_(Some(chain("this", vec![prop("b"), args(vec![])])))],
            )),
            function_stmt(named_func("b", vec![], Some("Int"), None, vec![return_(Some(int(1)))])),
        ],
    )];
    assert!(check(stmts).is_ok());
}

#[test]
fn test_initializer_calls_method() {
    let stmts = vec![
        class(
            "C",
            vec![
                var_("v", Some("Int"), Some(int(0))),
                function_stmt(named_func("m", vec![], Some("Int"), None, vec![return_(Some(int(1)))])),
                init(
                    vec![],
                    vec![assign(
                        "this",
                        &["v"],
                        AssignOp::Assign,
                        chain("this", vec![prop("m"), args(vec![])]),
                    )],
                ),
            ],
        ),
        let_("c", None, Some(new_("C", vec![]))),
    ];
    assert!(check(stmts).is_ok());
}

#[test]
fn test_property_needs_annotation() {
    assert_eq!(
        error_kind(vec![class("A", vec![let_("x", None, Some(int(1)))])]),
        ErrorKind::MissingAnnotation
    );
}

#[test]
fn test_property_default_must_be_literal() {
    assert_eq!(
        error_kind(vec![class(
            "A",
            vec![let_("x", Some("Int"), Some(binary(int(1), BinaryOp::Add, int(1))))]
        )]),
        ErrorKind::NonLiteralDefault
    );
}

#[test]
fn test_duplicate_property() {
    assert_eq!(
        error_kind(vec![class(
            "A",
            vec![let_("x", Some("Int"), None), var_("x", Some("Int"), None)]
        )]),
        ErrorKind::DuplicateProperty
    );
}

#[test]
fn test_initializer_collision() {
    assert_eq!(
        error_kind(vec![class(
            "A",
            vec![init(vec![param("a", Some("Int"))], vec![]), init(vec![param("b", Some("String"))], vec![])]
        )]),
        ErrorKind::InitializerCollision
    );
}

#[test]
fn test_initializer_cannot_return_value() {
    assert_eq!(
        error_kind(vec![class("A", vec![init(vec![], vec![return_(Some(int(1)))])])]),
        ErrorKind::ReturnTypeMismatch
    );
}

#[test]
fn test_new_without_initializer() {
    assert_eq!(
        error_kind(vec![class("A", vec![]), let_("a", None, Some(new_("A", vec![])))]),
        ErrorKind::NoInitializer
    );
}

#[test]
fn test_new_on_non_class() {
    assert_eq!(
        error_kind(vec![let_("x", None, Some(int(1))), let_("a", None, Some(new_("x", vec![])))]),
        ErrorKind::NotConstructible
    );
}

#[test]
fn test_unknown_property() {
    assert_eq!(
        error_kind(vec![
            point_class(),
            let_("p", None, Some(new_("Point", vec![int(1), int(2)]))),
            let_("z", None, Some(chain("p", vec![prop("z")]))),
        ]),
        ErrorKind::UnknownProperty
    );
}

#[test]
fn test_property_assignment_checks_type() {
    assert_eq!(
        error_kind(vec![
            point_class(),
            let_("p", None, Some(new_("Point", vec![int(1), int(2)]))),
            assign("p", &["x"], AssignOp::Assign, string("s")),
        ]),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn test_assign_through_raw_type() {
    assert_eq!(
        error_kind(vec![assign("Int", &["x"], AssignOp::Assign, int(1))]),
        ErrorKind::NotAnInstance
    );
}

#[test]
fn test_init_outside_class() {
    assert_eq!(error_kind(vec![init(vec![], vec![])]), ErrorKind::InvalidStatement);
}

#[test]
fn test_class_body_rejects_other_statements() {
    assert_eq!(
        error_kind(vec![class("A", vec![return_(None)])]),
        ErrorKind::InvalidStatement
    );
}

#[test]
fn test_equal_returns_across_blocks_unify() {
    let returns_in = |extra: Option<Spanned<Stmt>>| {
        let mut body = vec![
            if_(
                binary(ident("a"), BinaryOp::Lt, int(0)),
                vec![return_(Some(int(0)))],
                vec![],
                Some(vec![return_(Some(int(1)))]),
            ),
            return_(Some(int(2))),
        ];
        if let Some(stmt) = extra {
            body.insert(0, stmt);
        }
        vec![let_("f", None, Some(function_expr(func(vec![param("a", Some("Int"))], None, body))))]
    };

    let program = program(returns_in(None));
    let checker = check_program_with(&program, CheckerConfig::default()).unwrap();
    let ty = checker.type_info().node_type(program.statements[0].id).unwrap();
    assert_eq!(ty.to_string(), "(Int) -> Int");

    let distinct = while_(boolean(false), vec![return_(Some(float(0.5)))]);
    assert_eq!(error_kind(returns_in(Some(distinct))), ErrorKind::TooManyReturnTypes);
}

#[cfg(test)]
mod parser_tests {
    use monkey_interpreter as monkey;

    use monkey::ast::*;

    fn parse_ok(source: &str) -> Program {
        let (program, errors) = monkey::parse(source);

        assert!(errors.is_empty(), "parser errors for {:?}: {:?}", source, errors);

        program
    }

    fn single_expression(source: &str) -> Expression {
        let program = parse_ok(source);

        assert_eq!(program.statements.len(), 1, "statements in {:?}", source);

        match program.statements.into_iter().next() {
            Some(Statement::Expression(statement)) => statement.expression,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    fn assert_identifier(expression: &Expression, name: &str) {
        match expression {
            Expression::Identifier(ident) => {
                assert_eq!(ident.value, name);
                assert_eq!(ident.token.literal, name);
            }
            other => panic!("expected identifier {}, got {:?}", name, other),
        }
    }

    fn assert_integer(expression: &Expression, value: i64) {
        match expression {
            Expression::Integer(literal) => {
                assert_eq!(literal.value, value);
                assert_eq!(literal.token.literal, value.to_string());
            }
            other => panic!("expected integer {}, got {:?}", value, other),
        }
    }

    fn assert_infix(expression: &Expression, left: i64, operator: InfixOperator, right: i64) {
        match expression {
            Expression::Infix(infix) => {
                assert_integer(&infix.left, left);
                assert_eq!(infix.operator, operator);
                assert_integer(&infix.right, right);
            }
            other => panic!("expected infix expression, got {:?}", other),
        }
    }

    #[test]
    fn test_let_statements() {
        let cases = [
            ("let x = 5;", "x", "5"),
            ("let y = true;", "y", "true"),
            ("let foobar = y", "foobar", "y"),
        ];

        for (source, name, value) in cases {
            let program = parse_ok(source);
            assert_eq!(program.statements.len(), 1);

            match &program.statements[0] {
                Statement::Let(statement) => {
                    assert_eq!(statement.token.literal, "let");
                    assert_eq!(statement.name.value, name);
                    assert_eq!(statement.value.to_string(), value);
                }
                other => panic!("expected let statement, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_return_statements() {
        let cases = [("return 5;", "5"), ("return 10", "10"), ("return add(1);", "add(1)")];

        for (source, value) in cases {
            let program = parse_ok(source);

            match &program.statements[..] {
                [Statement::Return(statement)] => {
                    assert_eq!(statement.token.literal, "return");
                    assert_eq!(statement.value.to_string(), value);
                }
                other => panic!("expected one return statement, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_semicolons_are_optional() {
        let program = parse_ok("let a = 1 let b = 2; a b");

        assert_eq!(program.statements.len(), 4);
    }

    #[test]
    fn test_literal_expressions() {
        assert_identifier(&single_expression("foobar;"), "foobar");
        assert_integer(&single_expression("5;"), 5);

        match single_expression("true") {
            Expression::Boolean(b) => assert!(b.value),
            other => panic!("expected boolean, got {:?}", other),
        }

        match single_expression("\"hello world\"") {
            Expression::String(s) => assert_eq!(s.value, "hello world"),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_prefix_expressions() {
        let cases = [
            ("!5", PrefixOperator::Bang, "5"),
            ("-15", PrefixOperator::Minus, "15"),
            ("!true", PrefixOperator::Bang, "true"),
            ("!false", PrefixOperator::Bang, "false"),
        ];

        for (source, operator, right) in cases {
            match single_expression(source) {
                Expression::Prefix(prefix) => {
                    assert_eq!(prefix.operator, operator);
                    assert_eq!(prefix.right.to_string(), right);
                }
                other => panic!("expected prefix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_infix_expressions() {
        let cases = [
            ("5 + 5", InfixOperator::Plus),
            ("5 - 5", InfixOperator::Minus),
            ("5 * 5", InfixOperator::Asterisk),
            ("5 / 5", InfixOperator::Slash),
            ("5 > 5", InfixOperator::Gt),
            ("5 < 5", InfixOperator::Lt),
            ("5 == 5", InfixOperator::Eq),
            ("5 != 5", InfixOperator::NotEq),
        ];

        for (source, operator) in cases {
            assert_infix(&single_expression(source), 5, operator, 5);
        }
    }

    #[test]
    fn test_operator_precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)\n((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
            ("arr[2 + 3][1 + 1]", "((arr[(2 + 3)])[(1 + 1)])"),
        ];

        for (source, expected) in cases {
            assert_eq!(parse_ok(source).to_string(), expected, "source {:?}", source);
        }
    }

    #[test]
    fn test_if_expression() {
        match single_expression("if (x < y) { x }") {
            Expression::If(e) => {
                assert_eq!(e.condition.to_string(), "(x < y)");
                assert_eq!(e.consequence.statements.len(), 1);
                assert_eq!(e.consequence.statements[0].to_string(), "x");
                assert!(e.alternative.is_none());
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else_expression() {
        match single_expression("if (x < y) { x } else { y; z }") {
            Expression::If(e) => {
                let alternative = e.alternative.expect("alternative");
                assert_eq!(alternative.statements.len(), 2);
                assert_eq!(alternative.to_string(), "{ y; z }");
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn test_function_literal_parameters() {
        let cases: [(&str, &[&str]); 3] = [
            ("fn() {};", &[]),
            ("fn(x) {};", &["x"]),
            ("fn(x, y, z) {};", &["x", "y", "z"]),
        ];

        for (source, expected) in cases {
            match single_expression(source) {
                Expression::Function(f) => {
                    let names: Vec<&str> = f.parameters.iter().map(|p| p.value.as_str()).collect();
                    assert_eq!(names, expected);
                    assert!(f.body.statements.is_empty());
                }
                other => panic!("expected function literal, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_function_literal_body() {
        match single_expression("fn(x, y) { x + y; }") {
            Expression::Function(f) => {
                assert_eq!(f.body.statements.len(), 1);
                assert_eq!(f.body.statements[0].to_string(), "(x + y)");
            }
            other => panic!("expected function literal, got {:?}", other),
        }
    }

    #[test]
    fn test_call_expressions() {
        let cases: [(&str, &str, &[&str]); 4] = [
            ("foo();", "foo", &[]),
            ("add(1, 2 * 3, 4 + 5);", "add", &["1", "(2 * 3)", "(4 + 5)"]),
            ("minus(1, fn (){});", "minus", &["1", "fn() {}"]),
            ("fn(a, b) {}(1, 2)", "fn(a, b) {}", &["1", "2"]),
        ];

        for (source, function, arguments) in cases {
            match single_expression(source) {
                Expression::Call(call) => {
                    assert_eq!(call.function.to_string(), function);
                    let rendered: Vec<String> =
                        call.arguments.iter().map(ToString::to_string).collect();
                    assert_eq!(rendered, arguments);
                }
                other => panic!("expected call expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_array_literal() {
        match single_expression("[1, 2 * 2, 3 + 3]") {
            Expression::Array(array) => {
                assert_eq!(array.elements.len(), 3);
                assert_integer(&array.elements[0], 1);
                assert_infix(&array.elements[1], 2, InfixOperator::Asterisk, 2);
                assert_infix(&array.elements[2], 3, InfixOperator::Plus, 3);
            }
            other => panic!("expected array literal, got {:?}", other),
        }

        match single_expression("[]") {
            Expression::Array(array) => assert!(array.elements.is_empty()),
            other => panic!("expected array literal, got {:?}", other),
        }
    }

    #[test]
    fn test_index_expression() {
        match single_expression("myArray[1 + 1]") {
            Expression::Index(index) => {
                assert_identifier(&index.left, "myArray");
                assert_infix(&index.index, 1, InfixOperator::Plus, 1);
            }
            other => panic!("expected index expression, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_literals() {
        match single_expression(r#"{"one": 1, "two": 2, "three": 3}"#) {
            Expression::Hash(hash) => {
                let rendered: Vec<(String, String)> = hash
                    .pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                assert_eq!(
                    rendered,
                    vec![
                        ("one".to_string(), "1".to_string()),
                        ("two".to_string(), "2".to_string()),
                        ("three".to_string(), "3".to_string()),
                    ]
                );
            }
            other => panic!("expected hash literal, got {:?}", other),
        }

        match single_expression("{}") {
            Expression::Hash(hash) => assert!(hash.pairs.is_empty()),
            other => panic!("expected hash literal, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_literal_with_expressions() {
        match single_expression(r#"{"one": 0 + 1, two: 10 - 8, 3: 15 / 5}"#) {
            Expression::Hash(hash) => {
                assert_eq!(hash.pairs.len(), 3);
                assert_identifier(&hash.pairs[1].0, "two");
                assert_infix(&hash.pairs[0].1, 0, InfixOperator::Plus, 1);
                assert_infix(&hash.pairs[1].1, 10, InfixOperator::Minus, 8);
                assert_infix(&hash.pairs[2].1, 15, InfixOperator::Slash, 5);
            }
            other => panic!("expected hash literal, got {:?}", other),
        }
    }

    // ───────────────────────────── errors ─────────────────────────────

    #[test]
    fn test_let_errors_are_recoverable() {
        let (program, errors) = monkey::parse("let = 5; let y 10; let z = 3;");

        assert_eq!(
            errors,
            vec![
                "expected next token to be IDENT, got = instead".to_string(),
                "expected next token to be =, got INT instead".to_string(),
            ]
        );
        assert_eq!(program.to_string(), "let z = 3");
    }

    #[test]
    fn test_missing_prefix_function_is_fatal() {
        let (program, errors) = monkey::parse("1; ; 2");

        assert_eq!(errors, vec!["no prefix parse function for ; found".to_string()]);
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_illegal_token_is_reported() {
        let (_, errors) = monkey::parse("let a = $;");

        assert_eq!(errors, vec!["no prefix parse function for ILLEGAL found".to_string()]);
    }

    #[test]
    fn test_missing_delimiters_are_fatal() {
        let cases = [
            ("(1 + 2", "expected next token to be ), got EOF instead"),
            ("[1, 2", "expected next token to be ], got EOF instead"),
            ("add(1, 2", "expected next token to be ), got EOF instead"),
            ("if x { 1 }", "expected next token to be (, got IDENT instead"),
            ("if (x) 1", "expected next token to be {, got INT instead"),
            ("fn(x, 1) {}", "expected next token to be IDENT, got INT instead"),
            ("{1 2}", "expected next token to be :, got INT instead"),
            ("{1: 2 3: 4}", "expected next token to be ,, got INT instead"),
            ("a[1", "expected next token to be ], got EOF instead"),
        ];

        for (source, expected) in cases {
            let (_, errors) = monkey::parse(source);
            assert_eq!(errors, vec![expected.to_string()], "source {:?}", source);
        }
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        let (_, errors) = monkey::parse("99999999999999999999");

        assert_eq!(
            errors,
            vec!["could not parse 99999999999999999999 as integer".to_string()]
        );
    }

    #[test]
    fn test_unterminated_string_supersedes_parse_error() {
        let (program, errors) = monkey::parse("let a = 1; let s = \"abc");

        assert_eq!(errors, vec!["unterminated string".to_string()]);
        assert_eq!(program.to_string(), "let a = 1");
    }

    #[test]
    fn test_unterminated_string_after_complete_statement() {
        let (program, errors) = monkey::parse("5; \"abc");

        assert_eq!(errors, vec!["unterminated string".to_string()]);
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_unterminated_string_as_whole_program() {
        let (program, errors) = monkey::parse("\"abc");

        assert_eq!(errors, vec!["unterminated string".to_string()]);
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_let_recovery_stops_at_block_end() {
        let (program, errors) = monkey::parse("if (x) { let = 1 } let y 2; let 3;");

        assert_eq!(
            errors,
            vec![
                "expected next token to be IDENT, got = instead".to_string(),
                "expected next token to be =, got INT instead".to_string(),
                "expected next token to be IDENT, got INT instead".to_string(),
            ]
        );
        assert_eq!(program.to_string(), "if x {}");
    }

    #[test]
    fn test_let_recovery_keeps_following_statements() {
        let (program, errors) = monkey::parse("if (x) { let y 1 } let z = 2;");

        assert_eq!(errors, vec!["expected next token to be =, got INT instead".to_string()]);
        assert_eq!(program.to_string(), "if x {}\nlet z = 2");
    }

    #[test]
    fn test_let_recovery_skips_nested_braces() {
        let (program, errors) = monkey::parse("let f = fn() { let = fn() { 1 }; 2 }; f");

        assert_eq!(errors, vec!["expected next token to be IDENT, got = instead".to_string()]);
        assert_eq!(program.to_string(), "let f = fn() { 2 }\nf");
    }

    #[test]
    fn test_trailing_comma_is_rejected() {
        let cases = [
            ("[1, 2,]", "no prefix parse function for ] found"),
            ("f(1,)", "no prefix parse function for ) found"),
            ("{1: 2,}", "no prefix parse function for } found"),
        ];

        for (source, expected) in cases {
            let (_, errors) = monkey::parse(source);
            assert_eq!(errors, vec![expected.to_string()], "source {:?}", source);
        }
    }
}

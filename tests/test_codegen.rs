use jack_compiler::{
    compile::CodeGen,
    compile_str,
    error::{CompileError, SemanticError},
    lex::Lexer,
    parsing::{Class, Parser},
    token_stream::TokenStream,
};

const POINT: &str = include_str!("point.jack");

fn parse(source: &str) -> Class {
    let tokens = Lexer::new(source).tokenize().unwrap();
    Parser::new(TokenStream::new(tokens)).parse_class().unwrap()
}

fn compile(source: &str) -> Vec<String> {
    compile_str(source).unwrap()
}

#[test]
fn test_minimal_class() {
    let code = compile("class Main { function void main() { return; } }");
    assert_eq!(code, vec!["function Main.main 0", "push constant 0", "return", ""]);
}

#[test]
fn test_constructor_allocates_and_anchors_this() {
    let code = compile(POINT);
    assert_eq!(
        code,
        vec![
            "function Point.new 0",
            "push constant 2",
            "call Memory.alloc 1",
            "pop pointer 0",
            "push argument 0",
            "pop this 0",
            "push argument 1",
            "pop this 1",
            "push pointer 0",
            "return",
            "",
        ]
    );
}

#[test]
fn test_duplicate_constructor_is_fatal() {
    let source = "\
class Pair {
    field int a;
    constructor Pair new() { return this; }
    constructor Pair make() { return this; }
}";
    let err = compile_str(source).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Semantic(SemanticError::DuplicateConstructor { ref class }) if class.as_str() == "Pair"
    ));
}

#[test]
fn test_method_prologue_and_argument_shift() {
    let source = "\
class Point {
    field int x;
    method int plus(int dx) {
        return x + dx;
    }
}";
    let code = compile(source);
    assert_eq!(
        code,
        vec![
            "function Point.plus 0",
            "push argument 0",
            "pop pointer 0",
            "push this 0",
            "push argument 1",
            "add",
            "return",
            "",
        ]
    );
}

#[test]
fn test_expression_has_no_precedence_levels() {
    let code = compile("class Main { function int calc() { return 1 + 2 * 3; } }");
    assert_eq!(
        code,
        vec![
            "function Main.calc 0",
            "push constant 1",
            "push constant 2",
            "push constant 3",
            "call Math.multiply 2",
            "add",
            "return",
            "",
        ]
    );
}

#[test]
fn test_sibling_while_loops_get_increasing_labels() {
    let source = "\
class Main {
    function void run() {
        while (false) { do Output.println(); }
        while (false) { }
        return;
    }
}";
    let code = compile(source);

    let labels: Vec<&String> = code.iter().filter(|l| l.starts_with("label WHILE")).collect();
    assert_eq!(
        labels,
        vec!["label WHILE.0.CONDITION", "label WHILE.0.END", "label WHILE.1.CONDITION", "label WHILE.1.END"]
    );

    // Loop plumbing of the first while, including the discarded do call.
    let start = code.iter().position(|l| l == "label WHILE.0.CONDITION").unwrap();
    assert_eq!(
        &code[start..start + 8],
        &[
            "label WHILE.0.CONDITION",
            "push constant 0",
            "not",
            "if-goto WHILE.0.END",
            "call Output.println 0",
            "pop temp 0",
            "goto WHILE.0.CONDITION",
            "label WHILE.0.END",
        ]
    );
}

#[test]
fn test_if_with_else_jumps_over_else_block() {
    let source = "\
class Main {
    function int pick(boolean flag) {
        if (flag) { return 1; } else { return 2; }
    }
}";
    let code = compile(source);
    assert_eq!(
        code,
        vec![
            "function Main.pick 0",
            "push argument 0",
            "not",
            "if-goto IF.0.ELSE",
            "push constant 1",
            "return",
            "goto IF.0.END",
            "label IF.0.ELSE",
            "push constant 2",
            "return",
            "label IF.0.END",
            "",
        ]
    );
}

#[test]
fn test_if_without_else_skips_the_goto() {
    let source = "\
class Main {
    function void check(boolean flag) {
        if (flag) { do Output.println(); }
        return;
    }
}";
    let code = compile(source);
    assert!(code.contains(&"if-goto IF.0.END".to_owned()));
    assert!(!code.iter().any(|l| l.starts_with("goto IF")));
    assert!(!code.iter().any(|l| l.contains("IF.0.ELSE")));
}

#[test]
fn test_keyword_constants_and_unary_ops() {
    let source = "\
class Main {
    function int flags(boolean b) {
        if (b = true) { return -1; }
        if (b = false) { return ~0; }
        return 0;
    }
}";
    let code = compile(source);

    // true → push 1, neg; false → push 0.
    let first_cond = code.iter().position(|l| l == "push argument 0").unwrap();
    assert_eq!(&code[first_cond + 1..first_cond + 4], &["push constant 1", "neg", "eq"]);

    assert!(code.windows(2).any(|w| w == ["push constant 1", "neg"]));
    assert!(code.windows(2).any(|w| w == ["push constant 0", "not"]));
}

#[test]
fn test_array_assignment_protects_target_address() {
    let source = "\
class Main {
    function void main() {
        var Array a;
        let a = Array.new(3);
        let a[1] = a[0] + 7;
        return;
    }
}";
    let code = compile(source);

    let start = code.iter().position(|l| l == "call Array.new 1").unwrap() + 2;
    assert_eq!(
        &code[start..start + 14],
        &[
            "push local 0",
            "push constant 1",
            "add",
            "push local 0",
            "push constant 0",
            "add",
            "pop pointer 1",
            "push that 0",
            "push constant 7",
            "add",
            "pop temp 0",
            "pop pointer 1",
            "push temp 0",
            "pop that 0",
        ]
    );
}

#[test]
fn test_string_literal_builds_character_by_character() {
    let source = "class Main { function void main() { var String s; let s = \"Hi\"; return; } }";
    let code = compile(source);

    let start = code.iter().position(|l| l == "push constant 2").unwrap();
    assert_eq!(
        &code[start..start + 7],
        &[
            "push constant 2",
            "call String.new 1",
            "push constant 72",
            "call String.appendChar 2",
            "push constant 105",
            "call String.appendChar 2",
            "pop local 0",
        ]
    );
}

#[test]
fn test_call_receivers() {
    let source = "\
class Game {
    field int score;

    method void step() {
        do draw();
        return;
    }

    method void draw() {
        do Output.println();
        return;
    }

    function void start() {
        var Game g;
        let g = Game.new();
        do g.step();
        return;
    }
}";
    let code = compile(source);

    // Unqualified call inside a method passes `this` along.
    let step = code.iter().position(|l| l == "function Game.step 0").unwrap();
    assert_eq!(
        &code[step + 1..step + 6],
        &["push argument 0", "pop pointer 0", "push pointer 0", "call Game.draw 1", "pop temp 0"]
    );

    // Class receiver: plain static call, no implicit receiver.
    assert!(code.contains(&"call Output.println 0".to_owned()));
    assert!(code.contains(&"call Game.new 0".to_owned()));

    // Variable receiver: pushed before the arguments, callee name
    // assembled from the declared type.
    let start = code.iter().position(|l| l == "function Game.start 1").unwrap();
    let call = code[start..].iter().position(|l| l == "call Game.step 1").unwrap() + start;
    assert_eq!(code[call - 1], "push local 0");
}

#[test]
fn test_static_variables_use_the_static_segment() {
    let source = "\
class Counter {
    static int total;

    function void bump() {
        let total = total + 1;
        return;
    }
}";
    let code = compile(source);
    assert!(code.contains(&"push static 0".to_owned()));
    assert!(code.contains(&"pop static 0".to_owned()));
}

#[test]
fn test_return_type_mismatches() {
    let err = compile_str("class Main { function void main() { return 1; } }").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Semantic(SemanticError::UnexpectedReturnValue { ref subroutine, .. }) if subroutine.as_str() == "Main.main"
    ));

    let err = compile_str("class Main { function int main() { return; } }").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Semantic(SemanticError::MissingReturnValue { ref subroutine, .. }) if subroutine.as_str() == "Main.main"
    ));
}

#[test]
fn test_regeneration_is_idempotent() {
    let class = parse(POINT);

    let first = CodeGen::generate(&class).unwrap();
    let second = CodeGen::generate(&class).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_label_counters_do_not_leak_across_runs() {
    let source = "\
class Main {
    function void run() {
        while (false) { }
        if (false) { }
        return;
    }
}";
    let class = parse(source);

    let first = CodeGen::generate(&class).unwrap();
    let second = CodeGen::generate(&class).unwrap();

    assert_eq!(first, second);
    assert!(second.contains(&"label WHILE.0.CONDITION".to_owned()));
    assert!(second.contains(&"label IF.0.END".to_owned()));

    // A different class generated afterwards also starts from zero.
    let other = parse("class Other { function void go() { while (false) { } return; } }");
    let code = CodeGen::generate(&other).unwrap();
    assert!(code.contains(&"label WHILE.0.CONDITION".to_owned()));
}

#[test]
fn test_blank_line_separates_subroutines() {
    let source = "\
class Main {
    function void a() { return; }
    function void b() { return; }
}";
    let code = compile(source);

    let blanks = code.iter().filter(|l| l.is_empty()).count();
    assert_eq!(blanks, 2);
    assert_eq!(code.last().unwrap(), "");

    let split = code.iter().position(|l| l.is_empty()).unwrap();
    assert_eq!(code[split + 1], "function Main.b 0");
}

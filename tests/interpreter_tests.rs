// Integration tests for the reference interpreter on JSFuck building blocks

use peel::interpreter::{define_binding, HostError, Interpreter};
use peel::runtime::{display, Environment, Value};

fn eval(source: &str) -> Result<Value, HostError> {
    Interpreter::new().run(source, &mut Environment::with_globals())
}

fn shown(source: &str) -> String {
    display(&eval(source).expect("evaluation failed")).expect("display failed")
}

fn string(source: &str) -> String {
    match eval(source) {
        Ok(Value::Str(s)) => s,
        other => panic!("Expected string from {:?}, got {:?}", source, other),
    }
}

#[test]
fn test_primitives() {
    assert!(matches!(eval("![]"), Ok(Value::Bool(false))));
    assert!(matches!(eval("!![]"), Ok(Value::Bool(true))));
    assert!(matches!(eval("+[]"), Ok(Value::Number(n)) if n == 0.0));
    assert!(matches!(eval("+!+[]"), Ok(Value::Number(n)) if n == 1.0));
    assert!(matches!(eval("[][[]]"), Ok(Value::Undefined)));
    assert!(matches!(eval("+[![]]"), Ok(Value::Number(n)) if n.is_nan()));
}

#[test]
fn test_string_coercions() {
    assert_eq!(string("[]+{}"), "[object Object]");
    assert_eq!(string("![]+[]"), "false");
    assert_eq!(string("[][[]]+[]"), "undefined");
    assert_eq!(string("+!+[]+[+[]]"), "10");
    assert_eq!(string("[]['entries']()+[]"), "[object Array Iterator]");
}

#[test]
fn test_letters_by_index() {
    assert_eq!(string("(![]+[])[+[]]"), "f");
    assert_eq!(string("(!![]+[])[+!+[]]"), "r");
    assert_eq!(string("([][[]]+[])[!+[]+!+[]]"), "d");
    assert_eq!(string("(+[![]]+[])[+!+[]]"), "a");
}

#[test]
fn test_infinity_from_exponent() {
    let source = "+(+!+[]+(!+[]+[])[!+[]+!+[]+!+[]]+[+!+[]]+[+[]]+[+[]]+[+[]])+[]";
    assert_eq!(string(source), "Infinity");
}

#[test]
fn test_method_values_display() {
    assert_eq!(shown("[]['flat']"), "function flat(){}");
    assert_eq!(shown("[]['flat']['constructor']"), "function Function(){}");
    assert_eq!(string("[]['flat']+[]"), "function flat() { [native code] }");
}

#[test]
fn test_function_constructor() {
    assert!(matches!(
        eval("[]['flat']['constructor']('return 1+1')()"),
        Ok(Value::Number(n)) if n == 2.0
    ));
    assert_eq!(string("[]['flat']['constructor']('return escape')()('[')"), "%5B");
    assert_eq!(
        string("[]['flat']['constructor']('a', 'b', 'return a+b')('x', 'y')"),
        "xy"
    );
}

#[test]
fn test_string_methods() {
    assert_eq!(string("(![]+[])['italics']()"), "<i>false</i>");
    assert_eq!(string("'abc'['slice'](-2)"), "bc");
    assert_eq!(string("'a-b-c'['split']('-')['join']('')"), "abc");
    assert_eq!(string("(35)['toString'](36)"), "z");
    assert_eq!(string("'x'['repeat'](3)"), "xxx");
}

#[test]
fn test_array_methods_with_callbacks() {
    let ctor = "[]['flat']['constructor']";
    let double = format!("[1,2,3]['map']({}('x', 'return x*2'))", ctor);
    assert_eq!(shown(&double), "[2,4,6]");

    let sorted = format!("[3,1,2]['sort']({}('a', 'b', 'return b-a'))", ctor);
    assert_eq!(shown(&sorted), "[3,2,1]");

    assert_eq!(shown("[[1,[2]],3]['flat']()"), "[1,[2],3]");
    assert_eq!(shown("[1,2]['concat'](3,[4])"), "[1,2,3,4]");
}

#[test]
fn test_display_strings() {
    assert_eq!(shown("1+1"), "2");
    assert_eq!(shown("'a'+1"), "\"a1\"");
    assert_eq!(shown("[1,'b',[]]"), "[1,\"b\",[]]");
    assert_eq!(shown("[[][[]], []['flat']]"), "[null,null]");
    assert_eq!(shown("void 0"), "undefined");
    assert_eq!(shown("1/0"), "Infinity");
}

#[test]
fn test_errors() {
    assert_eq!(
        eval("foo").unwrap_err(),
        HostError::Reference("foo is not defined".to_string())
    );
    assert!(matches!(eval("[]['nope']()"), Err(HostError::Type(_))));
    assert!(matches!(eval("[][[]]['x']"), Err(HostError::Type(_))));
    assert!(matches!(eval("'x'['repeat'](-1)"), Err(HostError::Range(_))));
    assert!(matches!(eval("[] = 1"), Err(HostError::Syntax(_))));
}

#[test]
fn test_bindings_persist_across_evaluations() {
    let mut interpreter = Interpreter::new();
    let mut env = Environment::with_globals();

    define_binding(&mut interpreter, &mut env, "f", "(![]+[])[+[]]").unwrap();
    let value = interpreter.run("f+f", &mut env).unwrap();
    assert!(matches!(value, Value::Str(ref s) if s == "ff"));

    env.remove("f");
    assert!(interpreter.run("f", &mut env).is_err());
}

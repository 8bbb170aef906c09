// Constants for the reference interpreter

/// Nested `Function(...)` calls allowed before a RangeError
pub const MAX_CALL_DEPTH: usize = 256;

/// Nested sub-expression evaluations allowed before a RangeError. Operands of
/// a left-assoc binary chain share one level.
pub const MAX_EVAL_DEPTH: usize = 1024;

/// Methods reachable as properties of arrays
pub const ARRAY_METHODS: &[&str] = &[
    "at", "concat", "entries", "every", "fill", "filter", "find", "findIndex", "flat", "forEach",
    "includes", "indexOf", "join", "lastIndexOf", "map", "pop", "push", "reverse", "shift",
    "slice", "some", "sort", "toString", "unshift",
];

/// Methods reachable as properties of strings
pub const STRING_METHODS: &[&str] = &[
    "anchor", "at", "big", "blink", "bold", "charAt", "charCodeAt", "codePointAt", "concat",
    "endsWith", "fixed", "fontcolor", "fontsize", "includes", "indexOf", "italics",
    "lastIndexOf", "link", "padEnd", "padStart", "repeat", "replace", "slice", "small", "split",
    "startsWith", "strike", "sub", "substr", "substring", "sup", "toLowerCase", "toString",
    "toUpperCase", "trim", "trimEnd", "trimStart", "valueOf",
];

pub const NUMBER_METHODS: &[&str] = &["toFixed", "toString", "valueOf"];

pub const BOOLEAN_METHODS: &[&str] = &["toString", "valueOf"];

pub const OBJECT_METHODS: &[&str] = &["hasOwnProperty", "toString", "valueOf"];

pub const FUNCTION_METHODS: &[&str] = &["apply", "call", "toString"];

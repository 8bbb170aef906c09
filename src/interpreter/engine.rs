// Execution engine for the reference interpreter

use crate::interpreter::coercion::{property_key, to_string};
use crate::interpreter::constants::{MAX_CALL_DEPTH, MAX_EVAL_DEPTH};
use crate::interpreter::errors::HostError;
use crate::interpreter::HostEvaluator;
use crate::parser::ast::{Expr, ExprKind};
use crate::parser::parse::Parser;
use crate::parser::SyntaxError;
use crate::runtime::display::number_to_string;
use crate::runtime::value::{Function, FunctionKind, Object, ObjectClass, ScriptBody};
use crate::runtime::{Environment, Value};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Activation record of a `Function(...)`-built function
#[derive(Debug)]
struct Frame {
    locals: FxHashMap<String, Value>,
    this: Value,
}

/// Tree-walking evaluator for the JavaScript subset JSFuck programs use
///
/// Bindings live in the [`Environment`] passed to every call; the interpreter
/// itself only holds the global object and the frames of functions that are
/// currently running.
#[derive(Debug)]
pub struct Interpreter {
    /// What `this` is at the top level and in plain calls
    global: Value,

    /// Innermost call last
    frames: Vec<Frame>,

    /// Sub-expressions currently being evaluated, bounded by [`MAX_EVAL_DEPTH`]
    depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            global: Value::object(Object::new(ObjectClass::Global)),
            frames: Vec::new(),
            depth: 0,
        }
    }

    /// Parse `source` as a program and evaluate it; the value is that of the
    /// last statement
    pub fn run(&mut self, source: &str, env: &mut Environment) -> Result<Value, HostError> {
        let program = Parser::new(source)?.parse_program()?;
        self.frames.clear();
        self.depth = 0;
        self.evaluate_expr(&program, env)
    }

    pub(crate) fn evaluate_expr(
        &mut self,
        expr: &Expr,
        env: &mut Environment,
    ) -> Result<Value, HostError> {
        if self.depth >= MAX_EVAL_DEPTH {
            return Err(HostError::Range(
                "Maximum expression nesting exceeded".to_string(),
            ));
        }
        self.depth += 1;
        let result = self.evaluate_kind(expr, env);
        self.depth -= 1;
        result
    }

    fn evaluate_kind(&mut self, expr: &Expr, env: &mut Environment) -> Result<Value, HostError> {
        match &expr.kind {
            ExprKind::Program(items) | ExprKind::Group(items) => {
                let mut last = Value::Undefined;
                for item in items {
                    last = self.evaluate_expr(item, env)?;
                }
                Ok(last)
            }
            ExprKind::Paren(inner) => self.evaluate_expr(inner, env),
            ExprKind::Unary { op, operand } => self.evaluate_unary_op(*op, operand, env),
            ExprKind::Binary { op, left, right } => self.evaluate_binary_op(*op, left, right, env),
            ExprKind::Array(items) => {
                let items = items
                    .iter()
                    .map(|item| self.evaluate_expr(item, env))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::array(items))
            }
            ExprKind::Object(props) => {
                let mut object = Object::new(ObjectClass::Plain);
                for prop in props {
                    let key = match (&prop.key.kind, prop.computed) {
                        (ExprKind::Str(s), false) => s.clone(),
                        (ExprKind::Number(n), false) => number_to_string(*n),
                        _ => property_key(&self.evaluate_expr(&prop.key, env)?),
                    };
                    let value = self.evaluate_expr(&prop.value, env)?;
                    object.set(key, value);
                }
                Ok(Value::object(object))
            }
            ExprKind::Member {
                object,
                property,
                computed,
            } => {
                let (_, value) = self.evaluate_member_access(object, property, *computed, env)?;
                Ok(value)
            }
            ExprKind::Call { callee, args } => self.evaluate_call(callee, args, env),
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(s) => Ok(Value::str(s.clone())),
            ExprKind::Ident(name) => self.lookup_identifier(name, env),
        }
    }

    fn evaluate_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        env: &mut Environment,
    ) -> Result<Value, HostError> {
        // A member callee passes its object along as `this`
        let (this, function) = match &callee.kind {
            ExprKind::Member {
                object,
                property,
                computed,
            } => self.evaluate_member_access(object, property, *computed, env)?,
            _ => (Value::Undefined, self.evaluate_expr(callee, env)?),
        };

        let args = args
            .iter()
            .map(|arg| self.evaluate_expr(arg, env))
            .collect::<Result<Vec<_>, _>>()?;

        match function {
            Value::Function(function) => self.call_function(&function, this, args, env),
            _ => Err(HostError::not_a_function(&describe_callee(callee))),
        }
    }

    pub(crate) fn call_function(
        &mut self,
        function: &Rc<Function>,
        this: Value,
        args: Vec<Value>,
        env: &mut Environment,
    ) -> Result<Value, HostError> {
        match &function.kind {
            FunctionKind::Global(global) => self.call_global(*global, args, env),
            FunctionKind::Method(prototype, name) => {
                self.call_method(*prototype, name, this, args, env)
            }
            FunctionKind::Script { params, body, .. } => {
                self.call_script(params, body, this, args, env)
            }
        }
    }

    /// Call `callee` if it is a function
    pub(crate) fn call_value(
        &mut self,
        callee: &Value,
        this: Value,
        args: Vec<Value>,
        env: &mut Environment,
    ) -> Result<Value, HostError> {
        match callee {
            Value::Function(function) => self.call_function(function, this, args, env),
            other => Err(HostError::not_a_function(&to_string(other))),
        }
    }

    fn call_script(
        &mut self,
        params: &[String],
        body: &ScriptBody,
        this: Value,
        args: Vec<Value>,
        env: &mut Environment,
    ) -> Result<Value, HostError> {
        if self.frames.len() >= MAX_CALL_DEPTH {
            return Err(HostError::Range(
                "Maximum call stack size exceeded".to_string(),
            ));
        }

        let mut args = args.into_iter();
        let locals = params
            .iter()
            .map(|p| (p.clone(), args.next().unwrap_or_default()))
            .collect();
        // Sloppy-mode functions see the global object for a missing `this`
        let this = if this.is_nullish() {
            self.global.clone()
        } else {
            this
        };
        self.frames.push(Frame { locals, this });

        let result = match body {
            ScriptBody::Return(expr) => self.evaluate_expr(expr, env),
            ScriptBody::Effects(statements) => statements
                .iter()
                .try_for_each(|s| self.evaluate_expr(s, env).map(drop))
                .map(|()| Value::Undefined),
        };

        self.frames.pop();
        result
    }

    /// Build a function from `Function(p1, ..., body)` arguments
    pub(crate) fn make_script_function(&self, args: &[Value]) -> Result<Value, HostError> {
        let (body, params) = match args.split_last() {
            Some((body, params)) => (to_string(body), params),
            None => (String::new(), &[][..]),
        };

        let params = params
            .iter()
            .map(to_string)
            .collect::<Vec<_>>()
            .join(",")
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>();

        if let Some(bad) = params.iter().find(|p| !is_identifier(p)) {
            return Err(HostError::Syntax(SyntaxError::new(
                format!("Invalid parameter name '{}'", bad),
                Default::default(),
            )));
        }

        log::debug!("Function({:?}) with params {:?}", body, params);
        let parsed = parse_body(&body)?;

        Ok(Value::function(Function {
            name: "anonymous".to_string(),
            kind: FunctionKind::Script {
                params,
                source: body,
                body: Rc::new(parsed),
            },
        }))
    }

    fn lookup_identifier(&self, name: &str, env: &Environment) -> Result<Value, HostError> {
        match name {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            "null" => return Ok(Value::Null),
            "this" => {
                return Ok(self
                    .frames
                    .last()
                    .map_or_else(|| self.global.clone(), |f| f.this.clone()))
            }
            _ => {}
        }

        if let Some(value) = self.frames.last().and_then(|f| f.locals.get(name)) {
            return Ok(value.clone());
        }

        match name {
            "undefined" => Ok(Value::Undefined),
            "NaN" => Ok(Value::Number(f64::NAN)),
            "Infinity" => Ok(Value::Number(f64::INFINITY)),
            _ => env
                .lookup(name)
                .cloned()
                .ok_or_else(|| HostError::not_defined(name)),
        }
    }

    /// Whether `name` resolves without a ReferenceError
    pub(crate) fn is_bound(&self, name: &str, env: &Environment) -> bool {
        self.lookup_identifier(name, env).is_ok()
    }
}

impl HostEvaluator for Interpreter {
    fn evaluate(&mut self, source: &str, env: &mut Environment) -> Result<Value, HostError> {
        log::trace!("evaluate {:?}", source);
        let result = self.run(source, env);
        if let Err(err) = &result {
            log::debug!("evaluation of {:?} failed: {}", source, err);
        }
        result
    }
}

/// Parse a `Function` body: `return <expr>` or plain expression statements
fn parse_body(body: &str) -> Result<ScriptBody, HostError> {
    let trimmed = body.trim();

    if let Some(rest) = trimmed.strip_prefix("return") {
        if !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$') {
            let program = Parser::new(rest)?.parse_program()?;
            // Anything after the first statement is unreachable
            return Ok(match program.into_kind() {
                ExprKind::Program(mut statements) if !statements.is_empty() => {
                    ScriptBody::Return(statements.remove(0))
                }
                _ => ScriptBody::Effects(Vec::new()),
            });
        }
    }

    match Parser::new(trimmed)?.parse_program()?.into_kind() {
        ExprKind::Program(statements) => Ok(ScriptBody::Effects(statements)),
        _ => Ok(ScriptBody::Effects(Vec::new())),
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Short source-like description of a callee for error messages
fn describe_callee(callee: &Expr) -> String {
    match &callee.kind {
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Member {
            object,
            property,
            computed: false,
        } => match &property.kind {
            ExprKind::Ident(name) => format!("{}.{}", describe_callee(object), name),
            _ => "expression".to_string(),
        },
        ExprKind::Member { object, .. } => format!("{}[...]", describe_callee(object)),
        ExprKind::Array(_) => "[...]".to_string(),
        _ => "expression".to_string(),
    }
}

//! Core expression evaluator.

use std::thread;

use sat_types::ast::{Block, ExprKind, Expression, Primitive, Program};
use sat_types::scope::{ScopeId, Scopes};
use sat_types::{Config, ErrorCode, Location, Result, SatError};

use crate::feedback::Feedback;
use crate::http::{HttpClient, UreqClient};
use crate::{json, process};

/// Walks the expression tree, mutating scopes and performing side effects.
///
/// Runtime errors abort the whole run. Failed assertions do not; they are
/// recorded in the scope they ran in and reported through [`Feedback`].
pub struct Evaluator<'cfg> {
    scopes: Scopes,
    config: &'cfg Config,
    http: Box<dyn HttpClient>,
}

impl<'cfg> Evaluator<'cfg> {
    /// Evaluator that performs real HTTP requests.
    pub fn new(config: &'cfg Config) -> Self {
        Self {
            scopes: Scopes::new(),
            config,
            http: Box::new(UreqClient::new()),
        }
    }

    /// Replace the HTTP client used by `get:` and `healthcheck:`.
    pub fn with_http_client(mut self, client: impl HttpClient + 'static) -> Self {
        self.http = Box::new(client);
        self
    }

    /// Scopes as left by the last run.
    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program driver
    // ══════════════════════════════════════════════════════════════════════

    /// Run every root statement in order and collect test results.
    pub fn run(&mut self, program: Program) -> Result<Feedback> {
        self.config.trace(
            "run",
            format_args!("{} statements", program.expressions.len()),
        );
        self.scopes = program.scopes;
        let root = program.root;
        let mut feedback = Feedback::new();

        for expression in &program.expressions {
            match &expression.kind {
                ExprKind::Test { name, block } => self.run_test(&mut feedback, name, block)?,
                ExprKind::Assignment { .. }
                | ExprKind::Assert(_)
                | ExprKind::Get(_)
                | ExprKind::Run(_)
                | ExprKind::Kill(_)
                | ExprKind::Healthcheck(_) => {
                    self.evaluate(expression, root)?;
                }
                ExprKind::Spawn(_) => {
                    return Err(SatError::new(
                        ErrorCode::INVALID_EXPRESSION,
                        "spawn at the root level must be used in an assignment",
                        expression.location.clone(),
                    ));
                }
                _ => {
                    return Err(SatError::new(
                        ErrorCode::INVALID_EXPRESSION,
                        format!("unexpected {} at the root level", expression.kind_name()),
                        expression.location.clone(),
                    ));
                }
            }
        }
        Ok(feedback)
    }

    /// Run a test block in its own scope. Assertions from nested blocks
    /// count towards the test.
    fn run_test(&mut self, feedback: &mut Feedback, name: &str, block: &Block) -> Result<()> {
        self.config.trace("run_test", name);
        for expression in &block.expressions {
            self.evaluate(expression, block.scope)?;
        }
        let scopes = &self.scopes;
        let failures = scopes
            .subtree(block.scope)
            .into_iter()
            .flat_map(|scope| scopes.get(scope).asserts.iter())
            .filter(|result| !result.passed)
            .map(|result| result.location.clone())
            .collect();
        feedback.record(name, failures);
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression against `scope`.
    pub fn evaluate(&mut self, expression: &Expression, scope: ScopeId) -> Result<Primitive> {
        self.config.trace(
            "evaluate",
            format_args!("{} at {}", expression.kind_name(), expression.location),
        );
        let location = &expression.location;
        match &expression.kind {
            // Object and Array elements stay unevaluated until referenced.
            ExprKind::Primitive(value) => Ok(value.clone()),
            ExprKind::Assignment { left, right } => self.eval_assignment(left, right, scope),
            ExprKind::Equality { left, right } => {
                let left = self.evaluate(left, scope)?;
                let right = self.evaluate(right, scope)?;
                Ok(Primitive::Boolean(self.equals(&left, &right, scope)?))
            }
            ExprKind::Ref(path) => self.eval_ref(path, location, scope),
            ExprKind::MultiRef(_) => Err(SatError::new(
                ErrorCode::INVALID_EXPRESSION,
                "a list of names can only be assigned to",
                location.clone(),
            )),
            ExprKind::Assert(operand) => self.eval_assert(operand, location, scope),
            ExprKind::Test { .. } => Err(SatError::new(
                ErrorCode::INVALID_EXPRESSION,
                "tests can only be declared at the root level",
                location.clone(),
            )),
            ExprKind::Get(operand) => {
                let url = self.eval_string(operand, "get", scope)?;
                self.eval_get(&url, location)
            }
            ExprKind::Run(operand) => {
                let command = self.eval_string(operand, "run", scope)?;
                self.eval_run(&command, location)
            }
            ExprKind::Spawn(operand) => {
                let command = self.eval_string(operand, "spawn", scope)?;
                process::spawn(&command)
                    .map(Primitive::Process)
                    .map_err(|e| {
                        SatError::new(
                            ErrorCode::PROCESS_ERROR,
                            format!("failed to spawn '{command}': {e}"),
                            location.clone(),
                        )
                    })
            }
            ExprKind::Kill(operand) => self.eval_kill(operand, location, scope),
            ExprKind::Healthcheck(operand) => {
                let url = self.eval_string(operand, "healthcheck", scope)?;
                self.eval_healthcheck(&url, location)
            }
            ExprKind::Block(block) => {
                let mut last = Primitive::Void;
                for expression in &block.expressions {
                    last = self.evaluate(expression, block.scope)?;
                }
                Ok(last)
            }
        }
    }

    /// Evaluate an operand that must produce a String.
    fn eval_string(
        &mut self,
        operand: &Expression,
        keyword: &str,
        scope: ScopeId,
    ) -> Result<String> {
        match self.evaluate(operand, scope)? {
            Primitive::String(s) => Ok(s),
            other => Err(SatError::new(
                ErrorCode::TYPE_MISMATCH,
                format!("{keyword} expects a string, found {}", other.type_name()),
                operand.location.clone(),
            )),
        }
    }

    // ── Bindings ─────────────────────────────────────────────────────────

    fn eval_assignment(
        &mut self,
        left: &Expression,
        right: &Expression,
        scope: ScopeId,
    ) -> Result<Primitive> {
        match &left.kind {
            ExprKind::Ref(name) => {
                check_target(name, &left.location)?;
                let value = self.evaluate(right, scope)?;
                self.scopes.define(scope, name.clone(), value.clone());
                Ok(value)
            }
            ExprKind::MultiRef(names) => {
                for name in names {
                    check_target(name, &left.location)?;
                }
                let values = match self.evaluate(right, scope)? {
                    Primitive::Multi(values) => values,
                    other => {
                        return Err(SatError::new(
                            ErrorCode::TYPE_MISMATCH,
                            format!(
                                "expected an expression returning multiple values, found {}",
                                other.type_name()
                            ),
                            right.location.clone(),
                        ));
                    }
                };
                if names.len() > values.len() {
                    return Err(SatError::new(
                        ErrorCode::TOO_FEW_VALUES,
                        format!(
                            "expression returns {} values but {} names were given",
                            values.len(),
                            names.len()
                        ),
                        left.location.clone(),
                    ));
                }
                let first = values.first().cloned().unwrap_or(Primitive::Void);
                for (name, value) in names.iter().zip(values) {
                    self.scopes.define(scope, name.clone(), value);
                }
                Ok(first)
            }
            _ => Err(SatError::new(
                ErrorCode::INVALID_ASSIGNMENT,
                format!("cannot assign to {}", left.kind_name()),
                left.location.clone(),
            )),
        }
    }

    /// Resolve `name` or `name.seg.seg`. Only `scope` itself is searched;
    /// enclosing scopes are not.
    fn eval_ref(&mut self, path: &str, location: &Location, scope: ScopeId) -> Result<Primitive> {
        let mut segments = path.split('.');
        let name = segments.next().unwrap_or_default();
        let mut value = self.scopes.lookup(scope, name).cloned().ok_or_else(|| {
            SatError::new(
                ErrorCode::UNDEFINED_VARIABLE,
                format!("undefined variable '{name}'"),
                location.clone(),
            )
        })?;

        for segment in segments {
            value = match value {
                Primitive::Object(props) => {
                    let element = props.get(segment).ok_or_else(|| {
                        SatError::new(
                            ErrorCode::MISSING_FIELD,
                            format!("object has no field '{segment}' in '{path}'"),
                            location.clone(),
                        )
                    })?;
                    self.evaluate(element, scope)?
                }
                Primitive::Array(items) => {
                    let index: usize = segment.parse().map_err(|_| {
                        SatError::new(
                            ErrorCode::TYPE_MISMATCH,
                            format!("array index must be a number, found '{segment}' in '{path}'"),
                            location.clone(),
                        )
                    })?;
                    let element = items.get(index).ok_or_else(|| {
                        SatError::new(
                            ErrorCode::INDEX_OUT_OF_RANGE,
                            format!(
                                "index {index} out of range for array of length {} in '{path}'",
                                items.len()
                            ),
                            location.clone(),
                        )
                    })?;
                    self.evaluate(element, scope)?
                }
                other => {
                    return Err(SatError::new(
                        ErrorCode::TYPE_MISMATCH,
                        format!(
                            "cannot read '{segment}' from {} in '{path}'",
                            other.type_name()
                        ),
                        location.clone(),
                    ));
                }
            };
        }
        Ok(value)
    }

    // ── Assertions ───────────────────────────────────────────────────────

    fn eval_assert(
        &mut self,
        operand: &Expression,
        location: &Location,
        scope: ScopeId,
    ) -> Result<Primitive> {
        let passed = match self.evaluate(operand, scope)? {
            Primitive::Boolean(b) => b,
            other => {
                return Err(SatError::new(
                    ErrorCode::TYPE_MISMATCH,
                    format!("assert expects a boolean, found {}", other.type_name()),
                    location.clone(),
                ));
            }
        };
        self.scopes.record_assert(scope, location.clone(), passed);
        Ok(Primitive::Boolean(passed))
    }

    // ── Side effects ─────────────────────────────────────────────────────

    /// Returns `Multi[status, body]`.
    fn eval_get(&self, url: &str, location: &Location) -> Result<Primitive> {
        let response = self
            .http
            .get(url)
            .map_err(|e| SatError::new(ErrorCode::HTTP_ERROR, e.to_string(), location.clone()))?;
        log::debug!(target: "sat", "GET {url} -> {}", response.status);
        Ok(Primitive::Multi(vec![
            Primitive::Number(f32::from(response.status)),
            json::decode_body(&response.body, location),
        ]))
    }

    fn eval_run(&self, command: &str, location: &Location) -> Result<Primitive> {
        let status = process::run(command).map_err(|e| {
            SatError::new(
                ErrorCode::COMMAND_FAILED,
                format!("failed to run '{command}': {e}"),
                location.clone(),
            )
        })?;
        if status.success() {
            return Ok(Primitive::Number(0.0));
        }
        let err = SatError::new(
            ErrorCode::COMMAND_FAILED,
            format!("command '{command}' failed: {status}"),
            location.clone(),
        );
        Err(match status.code() {
            Some(code) => err.with_exit_code(code),
            None => err,
        })
    }

    fn eval_kill(
        &mut self,
        operand: &Expression,
        location: &Location,
        scope: ScopeId,
    ) -> Result<Primitive> {
        let handle = match self.evaluate(operand, scope)? {
            Primitive::Process(handle) => handle,
            other => {
                return Err(SatError::new(
                    ErrorCode::TYPE_MISMATCH,
                    format!("kill expects a process, found {}", other.type_name()),
                    operand.location.clone(),
                ));
            }
        };
        process::kill(&handle).map_err(|e| {
            SatError::new(
                ErrorCode::PROCESS_ERROR,
                format!("failed to kill '{}': {e}", handle.command()),
                location.clone(),
            )
        })?;
        Ok(Primitive::Void)
    }

    /// Poll `url` until it answers 200 or the attempts run out.
    fn eval_healthcheck(&self, url: &str, location: &Location) -> Result<Primitive> {
        let settings = self.config.healthcheck;
        for attempt in 1..=settings.max_attempts {
            match self.http.get(url) {
                Ok(response) if response.status == 200 => {
                    log::debug!(target: "sat", "healthcheck {url} up after {attempt} attempt(s)");
                    return Ok(Primitive::Void);
                }
                Ok(response) => log::debug!(
                    target: "sat",
                    "healthcheck {url} attempt {attempt}/{}: status {}",
                    settings.max_attempts,
                    response.status
                ),
                Err(e) => log::debug!(
                    target: "sat",
                    "healthcheck {url} attempt {attempt}/{}: {e}",
                    settings.max_attempts
                ),
            }
            if attempt < settings.max_attempts {
                thread::sleep(settings.interval());
            }
        }
        Err(SatError::new(
            ErrorCode::HEALTHCHECK_TIMEOUT,
            format!(
                "healthcheck for '{url}' timed out after {} attempts",
                settings.max_attempts
            ),
            location.clone(),
        ))
    }
}

/// Dotted paths cannot be assigned to.
fn check_target(name: &str, location: &Location) -> Result<()> {
    if name.contains('.') {
        return Err(SatError::new(
            ErrorCode::INVALID_ASSIGNMENT,
            format!("cannot assign to field path '{name}'"),
            location.clone(),
        ));
    }
    Ok(())
}

/// Run a program with real HTTP access.
pub fn run(program: Program, config: &Config) -> Result<Feedback> {
    Evaluator::new(config).run(program)
}

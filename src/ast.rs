use std::{fmt, rc::Rc};

/// A position in the source text.
///
/// Both coordinates are 1-based. Every token and almost every AST node
/// carries one so that errors can point at the offending construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// The line, starting at 1.
    pub line:   usize,
    /// The column within the line, starting at 1.
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The declared-type vocabulary of the language.
///
/// Runtime values report one of these through `typeof`, declarations may name
/// one as an annotation, and the parser infers one for every expression so
/// that initializers can be checked without evaluating them. `Omni` doubles as
/// "unknown until runtime" for inferred kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `null`
    Null,
    /// `int`
    Integer,
    /// `float`
    Float,
    /// `string`
    String,
    /// `char`
    Character,
    /// `bool`
    Bool,
    /// `array`
    Array,
    /// `dict`
    Dictionary,
    /// `func`
    Function,
    /// `enum`
    Enum,
    /// `unit`
    Unit,
    /// `object`, an instance of a unit.
    UnitInstance,
    /// `realm`
    Realm,
    /// `any` / `omni`
    Omni,
    /// `pair`
    Pair,
    /// `file`
    File,
    /// `vec2`
    Vec2,
    /// `vec3`
    Vec3,
    /// `vec4`
    Vec4,
    /// `comparator`
    Comparator,
}

impl TypeKind {
    /// Every type in the vocabulary, in declaration order.
    pub const ALL: [Self; 20] = [Self::Null,
                                 Self::Integer,
                                 Self::Float,
                                 Self::String,
                                 Self::Character,
                                 Self::Bool,
                                 Self::Array,
                                 Self::Dictionary,
                                 Self::Function,
                                 Self::Enum,
                                 Self::Unit,
                                 Self::UnitInstance,
                                 Self::Realm,
                                 Self::Omni,
                                 Self::Pair,
                                 Self::File,
                                 Self::Vec2,
                                 Self::Vec3,
                                 Self::Vec4,
                                 Self::Comparator];

    /// The name used in annotations and returned by `typeof`.
    ///
    /// ```
    /// use wio::ast::TypeKind;
    ///
    /// assert_eq!(TypeKind::Integer.name(), "int");
    /// assert_eq!(TypeKind::from_name("object"), Some(TypeKind::UnitInstance));
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Character => "char",
            Self::Bool => "bool",
            Self::Array => "array",
            Self::Dictionary => "dict",
            Self::Function => "func",
            Self::Enum => "enum",
            Self::Unit => "unit",
            Self::UnitInstance => "object",
            Self::Realm => "realm",
            Self::Omni => "omni",
            Self::Pair => "pair",
            Self::File => "file",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Comparator => "comparator",
        }
    }

    /// The constant name under which `wio.types` exposes this type.
    #[must_use]
    pub const fn constant_name(self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::String => "STRING",
            Self::Character => "CHARACTER",
            Self::Bool => "BOOL",
            Self::Array => "ARRAY",
            Self::Dictionary => "DICTIONARY",
            Self::Function => "FUNCTION",
            Self::Enum => "ENUM",
            Self::Unit => "UNIT",
            Self::UnitInstance => "OBJECT",
            Self::Realm => "REALM",
            Self::Omni => "OMNI",
            Self::Pair => "PAIR",
            Self::File => "FILE",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
            Self::Comparator => "COMPARATOR",
        }
    }

    /// Resolves an annotation name. `any` is accepted as a synonym of `omni`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "any" {
            return Some(Self::Omni);
        }
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns `true` for integer and float.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind named by a declaration keyword or a parameter.
///
/// A binding kind is coarser than a [`TypeKind`]: `var` holds any single
/// value (scalars, enums, units, instances, realms), while the collection and
/// function kinds hold exactly their own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `var`
    Var,
    /// `array`
    Array,
    /// `dict`
    Dict,
    /// `func`
    Func,
    /// `omni`
    Omni,
}

impl BindingKind {
    /// Returns whether a value of type `kind` may be bound.
    ///
    /// `TypeKind::Omni` is accepted everywhere because it stands for a kind
    /// that is only known at runtime.
    ///
    /// ```
    /// use wio::ast::{BindingKind, TypeKind};
    ///
    /// assert!(BindingKind::Var.accepts(TypeKind::Integer));
    /// assert!(!BindingKind::Var.accepts(TypeKind::Array));
    /// assert!(BindingKind::Array.accepts(TypeKind::Omni));
    /// ```
    #[must_use]
    pub const fn accepts(self, kind: TypeKind) -> bool {
        if matches!(kind, TypeKind::Omni) {
            return true;
        }
        match self {
            Self::Omni => true,
            Self::Array => matches!(kind, TypeKind::Array),
            Self::Dict => matches!(kind, TypeKind::Dictionary),
            Self::Func => matches!(kind, TypeKind::Function),
            Self::Var => !matches!(kind, TypeKind::Array | TypeKind::Dictionary | TypeKind::Function),
        }
    }

    /// The keyword introducing this kind.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Array => "array",
            Self::Dict => "dict",
            Self::Func => "func",
            Self::Omni => "omni",
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Represents a literal value in the language.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Float(f64),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// A character literal such as `'a'`.
    Char(char),
    /// A string literal with escapes already resolved.
    String(String),
    /// `null`
    Null,
}

impl LiteralValue {
    /// The type of the literal.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Integer(_) => TypeKind::Integer,
            Self::Float(_) => TypeKind::Float,
            Self::Bool(_) => TypeKind::Bool,
            Self::Char(_) => TypeKind::Character,
            Self::String(_) => TypeKind::String,
            Self::Null => TypeKind::Null,
        }
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(r) => write!(f, "{r:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{c:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Null => f.write_str("null"),
        }
    }
}

/// A parameter of a function or lambda.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The parameter name.
    pub name:     String,
    /// The kind of value the parameter accepts.
    pub kind:     BindingKind,
    /// Whether the parameter binds the caller's storage instead of a clone.
    pub by_ref:   bool,
    /// Where the parameter is declared.
    pub location: Location,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.by_ref {
            f.write_str("ref ")?;
        }
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// Renders a parameter list as `(var a, ref array b)`.
#[must_use]
pub fn format_params(params: &[Param]) -> String {
    let list = params.iter().map(ToString::to_string).collect::<Vec<_>>();
    format!("({})", list.join(", "))
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Accessor variants carry `is_ref` and `is_lvalue` flags set by the parser:
/// `is_lvalue` marks the target of an assignment or increment, `is_ref` marks
/// an expression whose storage is aliased by a `ref` declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, character, boolean, null).
    Literal {
        /// The constant value.
        value:    LiteralValue,
        /// Location in the source code.
        location: Location,
    },
    /// Reference to a symbol by name.
    Identifier {
        /// Name of the symbol.
        name:      String,
        /// The storage is aliased by a `ref` binding.
        is_ref:    bool,
        /// The expression is written to.
        is_lvalue: bool,
        /// Location in the source code.
        location:  Location,
    },
    /// Array literal expression.
    Array {
        /// Elements of the array.
        elements: Vec<Self>,
        /// Location in the source code.
        location: Location,
    },
    /// Dictionary literal expression.
    Dictionary {
        /// Key and value expressions, in source order.
        entries:  Vec<(Self, Self)>,
        /// Location in the source code.
        location: Location,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left:     Box<Self>,
        /// The operator.
        op:       BinaryOperator,
        /// Right operand.
        right:    Box<Self>,
        /// Location in the source code.
        location: Location,
    },
    /// A prefix operation.
    Unary {
        /// The operator.
        op:       UnaryOperator,
        /// The operand.
        expr:     Box<Self>,
        /// Location in the source code.
        location: Location,
    },
    /// A postfix increment or decrement.
    Postfix {
        /// The operator.
        op:       PostfixOperator,
        /// The operand, always addressable.
        expr:     Box<Self>,
        /// Location in the source code.
        location: Location,
    },
    /// Plain or compound assignment.
    Assign {
        /// The storage written to.
        target:   Box<Self>,
        /// The assignment operator.
        op:       AssignOperator,
        /// The assigned expression.
        value:    Box<Self>,
        /// Location in the source code.
        location: Location,
    },
    /// `typeof(expr)`
    TypeOf {
        /// The inspected expression.
        expr:     Box<Self>,
        /// Location in the source code.
        location: Location,
    },
    /// Array or dictionary access (e.g. `arr[2]`, `dict["key"]`).
    Index {
        /// The collection.
        target:    Box<Self>,
        /// The index or key.
        index:     Box<Self>,
        /// The storage is aliased by a `ref` binding.
        is_ref:    bool,
        /// The expression is written to.
        is_lvalue: bool,
        /// Location in the source code.
        location:  Location,
    },
    /// Member access on an instance, unit, enum or realm (e.g. `p.x`).
    Member {
        /// The value whose member scope is consulted.
        target:    Box<Self>,
        /// The member name.
        name:      String,
        /// The storage is aliased by a `ref` binding.
        is_ref:    bool,
        /// The expression is written to.
        is_lvalue: bool,
        /// Location in the source code.
        location:  Location,
    },
    /// Function call expression (e.g. `sum(a, b)`).
    Call {
        /// The called expression.
        callee:    Box<Self>,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Location in the source code.
        location:  Location,
    },
    /// Anonymous function `@(params) { body }`.
    Lambda {
        /// The parameters.
        params:   Rc<[Param]>,
        /// The body statements.
        body:     Rc<[Statement]>,
        /// Location in the source code.
        location: Location,
    },
    /// Unit instantiation `Unit{ args }`.
    Instantiate {
        /// The expression naming the unit.
        unit:      Box<Self>,
        /// Constructor arguments.
        arguments: Vec<Self>,
        /// Location in the source code.
        location:  Location,
    },
}

impl Expr {
    /// Gets the location from `self`.
    /// ## Example
    /// ```
    /// use wio::ast::{Expr, Location};
    ///
    /// let expr = Expr::Identifier { name:      "x".to_string(),
    ///                               is_ref:    false,
    ///                               is_lvalue: false,
    ///                               location:  Location::new(5, 1), };
    ///
    /// assert_eq!(expr.location().line, 5);
    /// ```
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Literal { location, .. }
            | Self::Identifier { location, .. }
            | Self::Array { location, .. }
            | Self::Dictionary { location, .. }
            | Self::Binary { location, .. }
            | Self::Unary { location, .. }
            | Self::Postfix { location, .. }
            | Self::Assign { location, .. }
            | Self::TypeOf { location, .. }
            | Self::Index { location, .. }
            | Self::Member { location, .. }
            | Self::Call { location, .. }
            | Self::Lambda { location, .. }
            | Self::Instantiate { location, .. } => *location,
        }
    }

    /// The type of the expression as far as it is known before evaluation.
    ///
    /// Identifiers, accesses and calls depend on runtime state and report
    /// [`TypeKind::Omni`].
    #[must_use]
    pub fn static_kind(&self) -> TypeKind {
        match self {
            Self::Literal { value, .. } => value.kind(),
            Self::Array { .. } => TypeKind::Array,
            Self::Dictionary { .. } => TypeKind::Dictionary,
            Self::Lambda { .. } => TypeKind::Function,
            Self::Instantiate { .. } => TypeKind::UnitInstance,
            Self::TypeOf { .. } => TypeKind::String,
            Self::Binary { left, op, right, .. } => op.static_kind(left.static_kind(), right.static_kind()),
            Self::Unary { op: UnaryOperator::Not, .. } => TypeKind::Bool,
            Self::Unary { op: UnaryOperator::BitNot, .. } => TypeKind::Integer,
            Self::Unary { expr, .. } | Self::Postfix { expr, .. } => {
                let inner = expr.static_kind();
                if inner.is_numeric() { inner } else { TypeKind::Omni }
            },
            Self::Assign { op: AssignOperator::Assign, value, .. } => value.static_kind(),
            Self::Assign { .. }
            | Self::Identifier { .. }
            | Self::Index { .. }
            | Self::Member { .. }
            | Self::Call { .. } => TypeKind::Omni,
        }
    }

    /// Returns `true` if the expression denotes storage that can be written
    /// to or aliased.
    #[must_use]
    pub const fn is_addressable(&self) -> bool {
        matches!(self, Self::Identifier { .. } | Self::Index { .. } | Self::Member { .. })
    }

    /// Marks an addressable expression as written to.
    #[must_use]
    pub fn into_lvalue(mut self) -> Self {
        if let Self::Identifier { is_lvalue, .. }
               | Self::Index { is_lvalue, .. }
               | Self::Member { is_lvalue, .. } = &mut self
        {
            *is_lvalue = true;
        }
        self
    }

    /// Marks an addressable expression as aliased by a `ref` binding.
    #[must_use]
    pub fn into_ref(mut self) -> Self {
        if let Self::Identifier { is_ref, .. }
               | Self::Index { is_ref, .. }
               | Self::Member { is_ref, .. } = &mut self
        {
            *is_ref = true;
        }
        self
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Identifier { name, .. } => f.write_str(name),
            Self::Array { elements, .. } => {
                f.write_str("[")?;
                write_list(f, elements)?;
                f.write_str("]")
            },
            Self::Dictionary { entries, .. } => {
                f.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            },
            Self::Binary { left, op, right, .. } => write!(f, "({left} {op} {right})"),
            Self::Unary { op, expr, .. } => write!(f, "{op}{expr}"),
            Self::Postfix { op, expr, .. } => write!(f, "{expr}{op}"),
            Self::Assign { target, op, value, .. } => write!(f, "{target} {op} {value}"),
            Self::TypeOf { expr, .. } => write!(f, "typeof({expr})"),
            Self::Index { target, index, .. } => write!(f, "{target}[{index}]"),
            Self::Member { target, name, .. } => write!(f, "{target}.{name}"),
            Self::Call { callee, arguments, .. } => {
                write!(f, "{callee}(")?;
                write_list(f, arguments)?;
                f.write_str(")")
            },
            Self::Lambda { params, .. } => write!(f, "@{} {{ ... }}", format_params(params)),
            Self::Instantiate { unit, arguments, .. } => {
                write!(f, "{unit}{{")?;
                write_list(f, arguments)?;
                f.write_str("}")
            },
        }
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Left shift (`<<`)
    ShiftLeft,
    /// Right shift (`>>`)
    ShiftRight,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Bitwise and (`&`)
    BitAnd,
    /// Bitwise or (`|`)
    BitOr,
    /// Bitwise exclusive or (`^`)
    BitXor,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
    /// Logical exclusive or (`^^`)
    Xor,
}

impl BinaryOperator {
    /// Returns `true` for the six comparison operators.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self,
                 Self::Less
                 | Self::LessEqual
                 | Self::Greater
                 | Self::GreaterEqual
                 | Self::Equal
                 | Self::NotEqual)
    }

    /// Infers the result type from the operand types, mirroring the runtime
    /// operator table where the answer does not depend on values.
    #[must_use]
    pub const fn static_kind(self, left: TypeKind, right: TypeKind) -> TypeKind {
        use TypeKind::{Float, Integer, Omni, String};

        if self.is_comparison() || matches!(self, Self::And | Self::Or | Self::Xor) {
            return TypeKind::Bool;
        }
        match (self, left, right) {
            (Self::Add, String, _) => String,
            (Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod, Integer, Integer) => Integer,
            (Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod, Float, Integer | Float)
            | (Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod, Integer, Float) => Float,
            (Self::ShiftLeft | Self::ShiftRight | Self::BitAnd | Self::BitOr | Self::BitXor, _, _) => Integer,
            _ => Omni,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::And => "&&",
            Self::Or => "||",
            Self::Xor => "^^",
        };
        f.write_str(operator)
    }
}

/// Represents a prefix operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Arithmetic identity (`+x`).
    Plus,
    /// Logical not (`!x`).
    Not,
    /// Bitwise complement (`~x`).
    BitNot,
    /// Prefix increment (`++x`).
    Increment,
    /// Prefix decrement (`--x`).
    Decrement,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Negate => "-",
                        Self::Plus => "+",
                        Self::Not => "!",
                        Self::BitNot => "~",
                        Self::Increment => "++",
                        Self::Decrement => "--",
                    })
    }
}

/// Represents a postfix operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PostfixOperator {
    /// `x++`
    Increment,
    /// `x--`
    Decrement,
}

impl fmt::Display for PostfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Increment => "++",
                        Self::Decrement => "--",
                    })
    }
}

/// Represents an assignment operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssignOperator {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `%=`
    Mod,
}

impl AssignOperator {
    /// The binary operator applied by a compound assignment.
    #[must_use]
    pub const fn binary(self) -> Option<BinaryOperator> {
        match self {
            Self::Assign => None,
            Self::Add => Some(BinaryOperator::Add),
            Self::Sub => Some(BinaryOperator::Sub),
            Self::Mul => Some(BinaryOperator::Mul),
            Self::Div => Some(BinaryOperator::Div),
            Self::Mod => Some(BinaryOperator::Mod),
        }
    }
}

impl fmt::Display for AssignOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.binary() {
            None => f.write_str("="),
            Some(op) => write!(f, "{op}="),
        }
    }
}

/// Where a declaration stores its symbol.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Storage {
    /// The innermost scope.
    #[default]
    Default,
    /// `local`: explicitly the innermost scope.
    Local,
    /// `global`: the global scope, wherever the declaration appears.
    Global,
}

/// The optional prefix shared by all declarations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Qualifiers {
    /// `local` or `global`.
    pub storage:  Storage,
    /// `const`
    pub is_const: bool,
    /// `ref`
    pub is_ref:   bool,
}

/// Access level of a unit member.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    /// Reachable only from the owning unit.
    Hidden,
    /// Reachable from everywhere.
    Exposed,
    /// Reachable from the owning unit, units composed from it and trusted
    /// units.
    Shared,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Hidden => "hidden",
                        Self::Exposed => "exposed",
                        Self::Shared => "shared",
                    })
    }
}

/// A `var`, `array`, `dict` or `omni` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingDecl {
    /// The declaration keyword.
    pub kind:        BindingKind,
    /// The declared name.
    pub name:        String,
    /// An explicit `: type` annotation on `var` declarations.
    pub annotation:  Option<TypeKind>,
    /// The initializer, if any.
    pub initializer: Option<Expr>,
    /// Storage, `const` and `ref` prefix.
    pub qualifiers:  Qualifiers,
    /// Location in the source code.
    pub location:    Location,
}

/// The three shapes of a function declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionShape {
    /// `func f = g;` or `func f = null;`
    Alias(Option<Expr>),
    /// `func f = @(...) { ... };`
    Lambda(Expr),
    /// `func f(params);` (no body) or `func f(params) { ... }`.
    Signature {
        /// The parameters.
        params: Rc<[Param]>,
        /// The body; `None` for a forward declaration.
        body:   Option<Rc<[Statement]>>,
    },
}

/// A `func` declaration or definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// The function name.
    pub name:       String,
    /// Alias, lambda or signature form.
    pub shape:      FunctionShape,
    /// Storage, `const` and `ref` prefix.
    pub qualifiers: Qualifiers,
    /// Location in the source code.
    pub location:   Location,
}

/// One member of an `enum` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    /// The member name.
    pub name:     String,
    /// An explicit value (`Name = 4`).
    pub value:    Option<i64>,
    /// Location in the source code.
    pub location: Location,
}

/// An `enum` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    /// The enum name.
    pub name:       String,
    /// The members in declaration order.
    pub members:    Vec<EnumMember>,
    /// Storage prefix.
    pub qualifiers: Qualifiers,
    /// Location in the source code.
    pub location:   Location,
}

/// A `realm` (namespace) declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct RealmDecl {
    /// The realm name.
    pub name:       String,
    /// The declarations forming the realm's members.
    pub body:       Vec<Statement>,
    /// Storage prefix.
    pub qualifiers: Qualifiers,
    /// Location in the source code.
    pub location:   Location,
}

/// A declaration inside a unit body, with its access prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitMemberDecl {
    /// Explicit access level; the unit's default applies when absent.
    pub access:      Option<Access>,
    /// `outer`: the member is folded into units composed from this one
    /// instead of into this unit's own instances.
    pub is_outer:    bool,
    /// The wrapped declaration.
    pub declaration: Box<Statement>,
    /// Location in the source code.
    pub location:    Location,
}

/// A `unit` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDecl {
    /// The unit name.
    pub name:           String,
    /// `-final`: the unit cannot be composed into others.
    pub is_final:       bool,
    /// `-access <level>`: default access of members without a prefix.
    pub default_access: Option<Access>,
    /// `-from A, B`: parents, left to right.
    pub parents:        Vec<String>,
    /// `-trust unit X, Y`: units that may reach shared members.
    pub trusted:        Vec<String>,
    /// The member declarations.
    pub members:        Vec<UnitMemberDecl>,
    /// Storage prefix.
    pub qualifiers:     Qualifiers,
    /// Location in the source code.
    pub location:       Location,
}

/// What an `import` names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    /// A builtin pseudo-module such as `wio.io`.
    Builtin(String),
    /// A source file path, relative to the importing file.
    File(String),
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `{ ... }`
    Block {
        /// Statements inside the block.
        statements: Vec<Self>,
        /// Location in the source code.
        location:   Location,
    },
    /// An expression evaluated for its side effects.
    Expression {
        /// The expression to evaluate.
        expr:     Expr,
        /// Location in the source code.
        location: Location,
    },
    /// `if (cond) stmt else stmt`
    If {
        /// The condition, which must evaluate to a boolean.
        condition:   Expr,
        /// Executed when the condition holds.
        then_branch: Box<Self>,
        /// Executed otherwise.
        else_branch: Option<Box<Self>>,
        /// Location in the source code.
        location:    Location,
    },
    /// `for (init; cond; step) stmt`
    For {
        /// Declaration or expression run once before the loop.
        init:      Option<Box<Self>>,
        /// Checked before every iteration; absent means `true`.
        condition: Option<Expr>,
        /// Evaluated after every iteration.
        step:      Option<Expr>,
        /// The loop body.
        body:      Box<Self>,
        /// Location in the source code.
        location:  Location,
    },
    /// `foreach ([ref] item in expr) stmt` or `foreach (key, item in expr)
    /// stmt`
    Foreach {
        /// Index (arrays) or key (dictionaries) variable.
        key:      Option<String>,
        /// Element variable.
        item:     String,
        /// The element variable aliases the element.
        by_ref:   bool,
        /// The iterated collection.
        iterable: Expr,
        /// The loop body.
        body:     Box<Self>,
        /// Location in the source code.
        location: Location,
    },
    /// `while (cond) stmt`
    While {
        /// Checked before every iteration.
        condition: Expr,
        /// The loop body.
        body:      Box<Self>,
        /// Location in the source code.
        location:  Location,
    },
    /// `break;`
    Break {
        /// Location in the source code.
        location: Location,
    },
    /// `continue;`
    Continue {
        /// Location in the source code.
        location: Location,
    },
    /// `return [expr];`
    Return {
        /// The returned value; `null` when absent.
        value:    Option<Expr>,
        /// Location in the source code.
        location: Location,
    },
    /// `import "...";`
    Import {
        /// The imported module or file.
        target:   ImportTarget,
        /// Location in the source code.
        location: Location,
    },
    /// `var`, `array`, `dict` or `omni` declaration.
    Binding(BindingDecl),
    /// `func` declaration or definition.
    Function(FunctionDecl),
    /// `enum` declaration.
    Enum(EnumDecl),
    /// `realm` declaration.
    Realm(RealmDecl),
    /// `unit` declaration.
    Unit(UnitDecl),
}

impl Statement {
    /// Gets the location from `self`.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Block { location, .. }
            | Self::Expression { location, .. }
            | Self::If { location, .. }
            | Self::For { location, .. }
            | Self::Foreach { location, .. }
            | Self::While { location, .. }
            | Self::Break { location }
            | Self::Continue { location }
            | Self::Return { location, .. }
            | Self::Import { location, .. } => *location,
            Self::Binding(decl) => decl.location,
            Self::Function(decl) => decl.location,
            Self::Enum(decl) => decl.location,
            Self::Realm(decl) => decl.location,
            Self::Unit(decl) => decl.location,
        }
    }

    /// The name introduced by a declaration statement.
    #[must_use]
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Self::Binding(decl) => Some(&decl.name),
            Self::Function(decl) => Some(&decl.name),
            Self::Enum(decl) => Some(&decl.name),
            Self::Realm(decl) => Some(&decl.name),
            Self::Unit(decl) => Some(&decl.name),
            _ => None,
        }
    }
}

/// A parsed source file: its statements in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// The top-level statements.
    pub statements: Vec<Statement>,
}

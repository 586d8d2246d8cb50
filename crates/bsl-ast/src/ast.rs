//! The node taxonomy.
//!
//! Field layout follows the language constructs one-to-one; nodes that
//! introduce symbols carry the [`ItemId`] of their arena entry so analysis
//! passes can key per-symbol state without chasing the scope chain.

use bsl_position::{Comment, Place};
use bsl_token::{Directive, TokenKind, TokenValue};
use rustc_hash::FxHashMap;

use crate::symbols::{ItemId, Symbols};

/// Argument list of a call. A position left empty in source (skipped
/// positional argument) is `None`.
pub type Args = Vec<Option<Expr>>;

/// Root of the AST: one parsed module.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Module-level declarations in source order
    pub decls: Vec<Decl>,
    /// Auto variables of the module body
    pub auto: Vec<AutoDecl>,
    /// Statements of the module body
    pub body: Vec<Stmt>,
    /// Every exported declaration, in source order
    pub interface: Vec<ItemId>,
    /// Comments captured by the scanner, keyed by line number
    pub comments: FxHashMap<usize, Comment>,
    /// Symbol arena all identifier references point into
    pub symbols: Symbols,
}

// ===== Declarations =====

/// A module-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `Var` list at module level
    VarModList(VarModListDecl),
    /// Procedure or function
    Method(Box<MethodDecl>),
    /// Preprocessor instruction in declaration position
    Prep(PrepInst),
}

impl Decl {
    /// Span of the declaration.
    pub fn place(&self) -> Place {
        match self {
            Decl::VarModList(d) => d.place,
            Decl::Method(d) => d.place,
            Decl::Prep(p) => p.place(),
        }
    }
}

/// A module-level `Var` statement.
///
/// ```text
/// &НаКлиенте            // directive
/// Перем П1 Экспорт, П2; // list
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VarModListDecl {
    /// Compilation directive preceding the statement
    pub directive: Option<Directive>,
    /// The declared variables
    pub list: Vec<VarModDecl>,
    /// Span
    pub place: Place,
}

/// One variable of a module-level `Var` list.
#[derive(Debug, Clone, PartialEq)]
pub struct VarModDecl {
    /// Name, original case
    pub name: String,
    /// Arena entry of the declared symbol
    pub item: ItemId,
    /// Compilation directive of the enclosing list
    pub directive: Option<Directive>,
    /// Marked `Export`
    pub export: bool,
    /// Span
    pub place: Place,
}

/// A local variable declared with `Var` inside a method.
#[derive(Debug, Clone, PartialEq)]
pub struct VarLocDecl {
    /// Name, original case
    pub name: String,
    /// Arena entry of the declared symbol
    pub item: ItemId,
    /// Span
    pub place: Place,
}

/// A variable introduced implicitly by its first assignment.
///
/// ```text
/// Макс = 0;                         // `Макс` becomes an auto variable
/// Для Индекс = 0 По 10 Цикл ...     // so does `Индекс`
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AutoDecl {
    /// Name, original case
    pub name: String,
    /// Arena entry of the declared symbol
    pub item: ItemId,
    /// Site of the introducing assignment target
    pub place: Place,
}

/// A method parameter.
///
/// ```text
/// Процедура Тест(П1, Знач П2 = Неопределено)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    /// Name, original case
    pub name: String,
    /// Arena entry of the declared symbol
    pub item: ItemId,
    /// Declared with `Val`
    pub by_val: bool,
    /// Default value; restricted to a signed literal
    pub value: Option<Expr>,
    /// Span
    pub place: Place,
}

/// Signature of a procedure declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcSign {
    /// Name, original case
    pub name: String,
    /// Compilation directive
    pub directive: Option<Directive>,
    /// Parameters in source order
    pub params: Vec<ParamDecl>,
    /// Marked `Export`
    pub export: bool,
    /// Span of the signature line
    pub place: Place,
}

/// Signature of a function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncSign {
    /// Name, original case
    pub name: String,
    /// Compilation directive
    pub directive: Option<Directive>,
    /// Parameters in source order
    pub params: Vec<ParamDecl>,
    /// Marked `Export`
    pub export: bool,
    /// Span of the signature line
    pub place: Place,
}

/// Either signature of a method.
#[derive(Debug, Clone, PartialEq)]
pub enum Sign {
    /// Procedure signature
    Proc(ProcSign),
    /// Function signature
    Func(FuncSign),
}

impl Sign {
    /// Method name, original case.
    pub fn name(&self) -> &str {
        match self {
            Sign::Proc(s) => &s.name,
            Sign::Func(s) => &s.name,
        }
    }

    /// Declared parameters.
    pub fn params(&self) -> &[ParamDecl] {
        match self {
            Sign::Proc(s) => &s.params,
            Sign::Func(s) => &s.params,
        }
    }

    /// Marked `Export`.
    pub fn export(&self) -> bool {
        match self {
            Sign::Proc(s) => s.export,
            Sign::Func(s) => s.export,
        }
    }

    /// True for a function signature.
    pub fn is_func(&self) -> bool {
        matches!(self, Sign::Func(_))
    }

    /// Span of the signature line.
    pub fn place(&self) -> Place {
        match self {
            Sign::Proc(s) => s.place,
            Sign::Func(s) => s.place,
        }
    }
}

/// A procedure or function declaration.
///
/// ```text
/// &НаКлиенте
/// Функция Тест() Экспорт
///     Перем П1;    // vars
///     П1 = 2;      // body
///     П2 = П1 + 2; // the auto variable П2 is collected into `auto`
/// КонецФункции
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    /// Signature (procedure or function)
    pub sign: Sign,
    /// Arena entry of the declared method
    pub item: ItemId,
    /// `Var`-declared locals
    pub vars: Vec<VarLocDecl>,
    /// Auto variables in order of introduction
    pub auto: Vec<AutoDecl>,
    /// Method body
    pub body: Vec<Stmt>,
    /// Span from the signature to the closing keyword
    pub place: Place,
}

// ===== Expressions =====

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal of a primitive type
    Basic(BasicLitExpr),
    /// Identifier with optional call arguments and tail chain
    Ident(Box<IdentExpr>),
    /// Unary `+`/`-`
    Unary(Box<UnaryExpr>),
    /// Binary operation
    Binary(Box<BinaryExpr>),
    /// Logical negation `Не`
    Not(Box<NotExpr>),
    /// Parenthesized expression
    Paren(Box<ParenExpr>),
    /// Ternary `?(,,)`
    Ternary(Box<TernaryExpr>),
    /// Constructor `Новый`
    New(Box<NewExpr>),
    /// String literal of one or more fragments
    String(StringExpr),
}

impl Expr {
    /// Span of the expression.
    pub fn place(&self) -> Place {
        match self {
            Expr::Basic(e) => e.place,
            Expr::Ident(e) => e.place,
            Expr::Unary(e) => e.place,
            Expr::Binary(e) => e.place,
            Expr::Not(e) => e.place,
            Expr::Paren(e) => e.place,
            Expr::Ternary(e) => e.place,
            Expr::New(e) => e.place,
            Expr::String(e) => e.place,
        }
    }
}

/// A literal of a primitive type.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicLitExpr {
    /// Literal category (`Number`, `String`, `DateTime`, boolean/null keyword)
    pub kind: TokenKind,
    /// Decoded value
    pub value: TokenValue,
    /// Span
    pub place: Place,
}

/// One element of a tail chain.
#[derive(Debug, Clone, PartialEq)]
pub enum TailItem {
    /// `.Поле` or `.Метод(...)`
    Field(FieldExpr),
    /// `[Индекс]`
    Index(IndexExpr),
}

impl TailItem {
    /// Span of the tail element.
    pub fn place(&self) -> Place {
        match self {
            TailItem::Field(e) => e.place,
            TailItem::Index(e) => e.place,
        }
    }
}

/// Field access through a period, optionally a call.
///
/// ```text
/// Значение = Объект.Поле
/// Значение = Объект.Добавить(П1, П2)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldExpr {
    /// Member name; may be spelled like a reserved keyword
    pub name: String,
    /// Call arguments when this is a call
    pub args: Option<Args>,
    /// Span
    pub place: Place,
}

/// Index access.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    /// The index expression
    pub expr: Expr,
    /// Span
    pub place: Place,
}

/// An identifier reference.
///
/// `head` is the scope item the name resolved to, `tail` the sequence of
/// period and index accesses, and `args` the call arguments when the head
/// itself is called:
///
/// ```text
/// Возврат Запрос.Выполнить().Выгрузить()[0];
/// //      ^head  ^~~~~~~~~~~~~~~~~~~~~~~~ tail (two calls and an index)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IdentExpr {
    /// Arena entry the name resolved to
    pub head: ItemId,
    /// Call arguments when the head is a call
    pub args: Option<Args>,
    /// Trailing accesses
    pub tail: Vec<TailItem>,
    /// Span of the whole chain
    pub place: Place,
}

/// Unary `+` or `-`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    /// `TokenKind::Add` or `TokenKind::Sub`
    pub operator: TokenKind,
    /// Operand
    pub operand: Expr,
    /// Span
    pub place: Place,
}

/// A binary operation: logical (except `Не`), relational or arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    /// Left operand
    pub left: Expr,
    /// Operator token
    pub operator: TokenKind,
    /// Right operand
    pub right: Expr,
    /// Span
    pub place: Place,
}

/// Logical negation `Не`.
#[derive(Debug, Clone, PartialEq)]
pub struct NotExpr {
    /// Negated expression
    pub expr: Expr,
    /// Span
    pub place: Place,
}

/// A parenthesized expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    /// Inner expression
    pub expr: Expr,
    /// Span
    pub place: Place,
}

/// Ternary `?(Условие, Тогда, Иначе)`, optionally followed by a tail chain.
///
/// ```text
/// Значение = ?(Ложь, Неопределено, Новый Массив).Количество();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TernaryExpr {
    /// Condition
    pub cond: Expr,
    /// Value when true
    pub then_expr: Expr,
    /// Value when false
    pub else_expr: Expr,
    /// Trailing accesses applied to the result
    pub tail: Vec<TailItem>,
    /// Span
    pub place: Place,
}

/// Constructor `Новый`.
///
/// Either the type name or the argument list must be present:
///
/// ```text
/// Параметры = Новый Массив(1);
/// Массив = Новый (Тип("Массив"), Параметры);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    /// Constructed type name, when written inline
    pub name: Option<String>,
    /// Constructor arguments
    pub args: Args,
    /// Span
    pub place: Place,
}

/// A string literal of one or more fragments.
///
/// ```text
/// Строка1 = "Часть1" "Часть2";  // two String fragments
/// Строка2 = "Начало
/// | продолжение                 // StringMid
/// | окончание";                 // StringEnd
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    /// The fragments in source order
    pub list: Vec<BasicLitExpr>,
    /// Span
    pub place: Place,
}

// ===== Statements =====

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Assignment
    Assign(Box<AssignStmt>),
    /// `Возврат`
    Return(ReturnStmt),
    /// `Прервать`
    Break(BreakStmt),
    /// `Продолжить`
    Continue(ContinueStmt),
    /// `ВызватьИсключение`
    Raise(RaiseStmt),
    /// `Выполнить`
    Execute(ExecuteStmt),
    /// Procedure call in statement position
    Call(Box<CallStmt>),
    /// `Если`
    If(Box<IfStmt>),
    /// `Пока`
    While(Box<WhileStmt>),
    /// `Для`
    For(Box<ForStmt>),
    /// `Для Каждого`
    ForEach(Box<ForEachStmt>),
    /// `Попытка`
    Try(Box<TryStmt>),
    /// `Перейти`
    Goto(GotoStmt),
    /// Label
    Label(LabelStmt),
    /// Preprocessor instruction in statement position
    Prep(PrepInst),
}

impl Stmt {
    /// Span of the statement.
    pub fn place(&self) -> Place {
        match self {
            Stmt::Assign(s) => s.place,
            Stmt::Return(s) => s.place,
            Stmt::Break(s) => s.place,
            Stmt::Continue(s) => s.place,
            Stmt::Raise(s) => s.place,
            Stmt::Execute(s) => s.place,
            Stmt::Call(s) => s.place,
            Stmt::If(s) => s.place,
            Stmt::While(s) => s.place,
            Stmt::For(s) => s.place,
            Stmt::ForEach(s) => s.place,
            Stmt::Try(s) => s.place,
            Stmt::Goto(s) => s.place,
            Stmt::Label(s) => s.place,
            Stmt::Prep(p) => p.place(),
        }
    }
}

/// An assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    /// Assignment target
    pub left: IdentExpr,
    /// Assigned expression
    pub right: Expr,
    /// Span
    pub place: Place,
}

/// `Возврат`. `expr` is present iff the return sits inside a function.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    /// Returned expression
    pub expr: Option<Expr>,
    /// Span
    pub place: Place,
}

/// `Прервать`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakStmt {
    /// Span
    pub place: Place,
}

/// `Продолжить`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinueStmt {
    /// Span
    pub place: Place,
}

/// `ВызватьИсключение`. `expr` is absent for the bare re-raise form.
#[derive(Debug, Clone, PartialEq)]
pub struct RaiseStmt {
    /// Raised expression
    pub expr: Option<Expr>,
    /// Span
    pub place: Place,
}

/// `Выполнить`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteStmt {
    /// The executed source expression
    pub expr: Expr,
    /// Span
    pub place: Place,
}

/// A procedure (or function-as-procedure) call in statement position.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    /// The called identifier chain
    pub ident: IdentExpr,
    /// Span
    pub place: Place,
}

/// `Если ... Тогда ... ИначеЕсли ... Иначе ... КонецЕсли`.
///
/// `elsifs` and `else_part` are `None` when the corresponding blocks are
/// absent in source.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// Condition
    pub cond: Expr,
    /// Statements of the then block
    pub then_part: Vec<Stmt>,
    /// `ИначеЕсли` chain
    pub elsifs: Option<Vec<ElsIfStmt>>,
    /// `Иначе` block
    pub else_part: Option<ElseStmt>,
    /// Span
    pub place: Place,
}

/// One `ИначеЕсли` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ElsIfStmt {
    /// Condition
    pub cond: Expr,
    /// Statements of the block
    pub then_part: Vec<Stmt>,
    /// Span
    pub place: Place,
}

/// The `Иначе` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseStmt {
    /// Statements of the block
    pub body: Vec<Stmt>,
    /// Span
    pub place: Place,
}

/// `Пока ... Цикл ... КонецЦикла`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    /// Loop condition
    pub cond: Expr,
    /// Loop body
    pub body: Vec<Stmt>,
    /// Span
    pub place: Place,
}

/// `Для Индекс = 0 По Граница Цикл ... КонецЦикла`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// Loop variable
    pub ident: IdentExpr,
    /// Initial value
    pub from: Expr,
    /// Bound
    pub to: Expr,
    /// Loop body
    pub body: Vec<Stmt>,
    /// Span
    pub place: Place,
}

/// `Для Каждого Элемент Из Коллекция Цикл ... КонецЦикла`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStmt {
    /// Loop variable
    pub ident: IdentExpr,
    /// Iterated collection
    pub collection: Expr,
    /// Loop body
    pub body: Vec<Stmt>,
    /// Span
    pub place: Place,
}

/// `Попытка ... Исключение ... КонецПопытки`.
#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    /// Statements of the protected block
    pub body: Vec<Stmt>,
    /// The exception handler block
    pub except: ExceptStmt,
    /// Span
    pub place: Place,
}

/// The `Исключение` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptStmt {
    /// Statements of the handler
    pub body: Vec<Stmt>,
    /// Span
    pub place: Place,
}

/// `Перейти ~Метка`.
#[derive(Debug, Clone, PartialEq)]
pub struct GotoStmt {
    /// Target label name
    pub label: String,
    /// Span
    pub place: Place,
}

/// A label statement `~Метка:`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStmt {
    /// Label name
    pub label: String,
    /// Span
    pub place: Place,
}

// ===== Preprocessor =====

/// A preprocessor instruction. May appear anywhere a declaration or a
/// statement is syntactically valid; conditions are parsed but never
/// evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum PrepInst {
    /// `#Если ... Тогда`
    If(PrepIfInst),
    /// `#ИначеЕсли ... Тогда`
    ElsIf(PrepElsIfInst),
    /// `#Иначе`
    Else(PrepElseInst),
    /// `#КонецЕсли`
    EndIf(PrepEndIfInst),
    /// `#Область Имя`
    Region(PrepRegionInst),
    /// `#КонецОбласти`
    EndRegion(PrepEndRegionInst),
}

impl PrepInst {
    /// Span of the instruction.
    pub fn place(&self) -> Place {
        match self {
            PrepInst::If(i) => i.place,
            PrepInst::ElsIf(i) => i.place,
            PrepInst::Else(i) => i.place,
            PrepInst::EndIf(i) => i.place,
            PrepInst::Region(i) => i.place,
            PrepInst::EndRegion(i) => i.place,
        }
    }
}

/// `#Если Условие Тогда`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepIfInst {
    /// The availability condition
    pub cond: PrepExpr,
    /// Span
    pub place: Place,
}

/// `#ИначеЕсли Условие Тогда`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepElsIfInst {
    /// The availability condition
    pub cond: PrepExpr,
    /// Span
    pub place: Place,
}

/// `#Иначе`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepElseInst {
    /// Span
    pub place: Place,
}

/// `#КонецЕсли`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepEndIfInst {
    /// Span
    pub place: Place,
}

/// `#Область Имя`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepRegionInst {
    /// Region name
    pub name: String,
    /// Span
    pub place: Place,
}

/// `#КонецОбласти`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepEndRegionInst {
    /// Span
    pub place: Place,
}

/// A preprocessor expression.
#[derive(Debug, Clone, PartialEq)]
pub enum PrepExpr {
    /// `И` / `Или` combination
    Binary(Box<PrepBinaryExpr>),
    /// `Не`
    Not(Box<PrepNotExpr>),
    /// An availability symbol
    Sym(PrepSymExpr),
    /// Parenthesized condition
    Paren(Box<PrepParenExpr>),
}

impl PrepExpr {
    /// Span of the expression.
    pub fn place(&self) -> Place {
        match self {
            PrepExpr::Binary(e) => e.place,
            PrepExpr::Not(e) => e.place,
            PrepExpr::Sym(e) => e.place,
            PrepExpr::Paren(e) => e.place,
        }
    }
}

/// `Сервер Или ВнешнееСоединение`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepBinaryExpr {
    /// Left operand
    pub left: PrepExpr,
    /// `Keyword::And` or `Keyword::Or`
    pub operator: TokenKind,
    /// Right operand
    pub right: PrepExpr,
    /// Span
    pub place: Place,
}

/// `Не ВебКлиент`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepNotExpr {
    /// Negated condition
    pub expr: PrepExpr,
    /// Span
    pub place: Place,
}

/// A preprocessor symbol. `exist` is true when the spelling is one of the
/// known availability symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepSymExpr {
    /// Symbol spelling, original case
    pub symbol: String,
    /// Whether the symbol is known
    pub exist: bool,
    /// Span
    pub place: Place,
}

/// A parenthesized preprocessor condition.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepParenExpr {
    /// Inner condition
    pub expr: PrepExpr,
    /// Span
    pub place: Place,
}

// ===== Node tags =====

/// Discriminant of every node kind.
///
/// The visitor keeps its ancestor stack and per-kind counters in terms of
/// tags, so plugins can ask "how many open loops?" without borrowing nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Module,
    VarModListDecl,
    VarModDecl,
    VarLocDecl,
    AutoDecl,
    ParamDecl,
    MethodDecl,
    ProcSign,
    FuncSign,
    BasicLitExpr,
    FieldExpr,
    IndexExpr,
    IdentExpr,
    UnaryExpr,
    BinaryExpr,
    NewExpr,
    TernaryExpr,
    ParenExpr,
    NotExpr,
    StringExpr,
    AssignStmt,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    RaiseStmt,
    ExecuteStmt,
    CallStmt,
    IfStmt,
    ElsIfStmt,
    ElseStmt,
    WhileStmt,
    ForStmt,
    ForEachStmt,
    TryStmt,
    ExceptStmt,
    GotoStmt,
    LabelStmt,
    PrepIfInst,
    PrepElsIfInst,
    PrepElseInst,
    PrepEndIfInst,
    PrepRegionInst,
    PrepEndRegionInst,
    PrepBinaryExpr,
    PrepNotExpr,
    PrepSymExpr,
    PrepParenExpr,
}

impl NodeTag {
    /// True for the three loop statements.
    pub fn is_loop(self) -> bool {
        matches!(self, NodeTag::WhileStmt | NodeTag::ForStmt | NodeTag::ForEachStmt)
    }
}

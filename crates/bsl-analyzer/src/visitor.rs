//! The visitor: plugin hook dispatch, ancestor stack, per-kind counters.
//!
//! Traversal is deterministic depth-first, left-to-right, declarations
//! before body. For every compound node the visitor fires `enter_*`, pushes
//! the node's tag, walks the structural children in canonical order, pops,
//! and fires `leave_*`; leaf nodes fire `enter_*` only. The topmost
//! expression of every statement context is additionally bracketed with
//! `enter_expr`/`leave_expr` (`enter_prep_expr`/`leave_prep_expr` for
//! preprocessor conditions) — nested sub-expressions are not.
//!
//! Every plugin callback runs in an unwind-guarded frame: a panicking plugin
//! is logged and skipped, the traversal and the other plugins continue.

use std::panic::{AssertUnwindSafe, catch_unwind};

use rustc_hash::FxHashMap;

use bsl_ast::{
    AssignStmt, AutoDecl, BasicLitExpr, BinaryExpr, BreakStmt, CallStmt, ContinueStmt, Decl,
    ElsIfStmt, ElseStmt, ExceptStmt, ExecuteStmt, Expr, FieldExpr, ForEachStmt, ForStmt, FuncSign,
    GotoStmt, IdentExpr, IfStmt, IndexExpr, LabelStmt, MethodDecl, Module, NewExpr, NodeTag,
    NotExpr, ParamDecl, ParenExpr, PrepBinaryExpr, PrepElsIfInst, PrepElseInst, PrepEndIfInst,
    PrepEndRegionInst, PrepExpr, PrepIfInst, PrepInst, PrepNotExpr, PrepParenExpr, PrepRegionInst,
    PrepSymExpr, ProcSign, RaiseStmt, ReturnStmt, Sign, Stmt, StringExpr, TailItem, TernaryExpr,
    TryStmt, UnaryExpr, VarLocDecl, VarModDecl, VarModListDecl, WhileStmt,
};
use bsl_report::Issue;

/// Ambient traversal state available to every plugin callback.
#[derive(Debug, Default)]
pub struct VisitContext {
    stack: Vec<NodeTag>,
    counters: FxHashMap<NodeTag, u32>,
}

impl VisitContext {
    /// The currently open compound nodes, outermost first.
    pub fn stack(&self) -> &[NodeTag] {
        &self.stack
    }

    /// How many nodes of `tag` are currently open.
    pub fn count(&self, tag: NodeTag) -> u32 {
        self.counters.get(&tag).copied().unwrap_or(0)
    }

    /// True inside any `While`, `For` or `For Each` body or condition.
    pub fn in_loop(&self) -> bool {
        self.count(NodeTag::WhileStmt) + self.count(NodeTag::ForStmt) + self.count(NodeTag::ForEachStmt)
            > 0
    }
}

/// Enter/leave hooks over every node kind. All hooks default to no-ops;
/// a plugin overrides the ones it cares about.
#[allow(unused_variables)]
pub trait Plugin {
    /// Plugin name for panic logs.
    fn name(&self) -> &'static str;

    // Module
    fn enter_module(&mut self, node: &Module, ctx: &VisitContext) {}
    fn leave_module(&mut self, node: &Module, ctx: &VisitContext) {}

    // Declarations
    fn enter_var_mod_list_decl(&mut self, node: &VarModListDecl, ctx: &VisitContext) {}
    fn leave_var_mod_list_decl(&mut self, node: &VarModListDecl, ctx: &VisitContext) {}
    fn enter_var_mod_decl(&mut self, node: &VarModDecl, ctx: &VisitContext) {}
    fn enter_var_loc_decl(&mut self, node: &VarLocDecl, ctx: &VisitContext) {}
    fn enter_auto_decl(&mut self, node: &AutoDecl, ctx: &VisitContext) {}
    fn enter_param_decl(&mut self, node: &ParamDecl, ctx: &VisitContext) {}
    fn leave_param_decl(&mut self, node: &ParamDecl, ctx: &VisitContext) {}
    fn enter_method_decl(&mut self, node: &MethodDecl, ctx: &VisitContext) {}
    fn leave_method_decl(&mut self, node: &MethodDecl, ctx: &VisitContext) {}
    fn enter_proc_sign(&mut self, node: &ProcSign, ctx: &VisitContext) {}
    fn leave_proc_sign(&mut self, node: &ProcSign, ctx: &VisitContext) {}
    fn enter_func_sign(&mut self, node: &FuncSign, ctx: &VisitContext) {}
    fn leave_func_sign(&mut self, node: &FuncSign, ctx: &VisitContext) {}

    // Expression roots
    fn enter_expr(&mut self, node: &Expr, ctx: &VisitContext) {}
    fn leave_expr(&mut self, node: &Expr, ctx: &VisitContext) {}

    // Expressions
    fn enter_basic_lit_expr(&mut self, node: &BasicLitExpr, ctx: &VisitContext) {}
    fn enter_field_expr(&mut self, node: &FieldExpr, ctx: &VisitContext) {}
    fn leave_field_expr(&mut self, node: &FieldExpr, ctx: &VisitContext) {}
    fn enter_index_expr(&mut self, node: &IndexExpr, ctx: &VisitContext) {}
    fn leave_index_expr(&mut self, node: &IndexExpr, ctx: &VisitContext) {}
    fn enter_ident_expr(&mut self, node: &IdentExpr, ctx: &VisitContext) {}
    fn leave_ident_expr(&mut self, node: &IdentExpr, ctx: &VisitContext) {}
    fn enter_unary_expr(&mut self, node: &UnaryExpr, ctx: &VisitContext) {}
    fn leave_unary_expr(&mut self, node: &UnaryExpr, ctx: &VisitContext) {}
    fn enter_binary_expr(&mut self, node: &BinaryExpr, ctx: &VisitContext) {}
    fn leave_binary_expr(&mut self, node: &BinaryExpr, ctx: &VisitContext) {}
    fn enter_new_expr(&mut self, node: &NewExpr, ctx: &VisitContext) {}
    fn leave_new_expr(&mut self, node: &NewExpr, ctx: &VisitContext) {}
    fn enter_ternary_expr(&mut self, node: &TernaryExpr, ctx: &VisitContext) {}
    fn leave_ternary_expr(&mut self, node: &TernaryExpr, ctx: &VisitContext) {}
    fn enter_paren_expr(&mut self, node: &ParenExpr, ctx: &VisitContext) {}
    fn leave_paren_expr(&mut self, node: &ParenExpr, ctx: &VisitContext) {}
    fn enter_not_expr(&mut self, node: &NotExpr, ctx: &VisitContext) {}
    fn leave_not_expr(&mut self, node: &NotExpr, ctx: &VisitContext) {}
    fn enter_string_expr(&mut self, node: &StringExpr, ctx: &VisitContext) {}
    fn leave_string_expr(&mut self, node: &StringExpr, ctx: &VisitContext) {}

    // Statements
    fn enter_assign_stmt(&mut self, node: &AssignStmt, ctx: &VisitContext) {}
    fn leave_assign_stmt(&mut self, node: &AssignStmt, ctx: &VisitContext) {}
    fn enter_return_stmt(&mut self, node: &ReturnStmt, ctx: &VisitContext) {}
    fn leave_return_stmt(&mut self, node: &ReturnStmt, ctx: &VisitContext) {}
    fn enter_break_stmt(&mut self, node: &BreakStmt, ctx: &VisitContext) {}
    fn enter_continue_stmt(&mut self, node: &ContinueStmt, ctx: &VisitContext) {}
    fn enter_raise_stmt(&mut self, node: &RaiseStmt, ctx: &VisitContext) {}
    fn leave_raise_stmt(&mut self, node: &RaiseStmt, ctx: &VisitContext) {}
    fn enter_execute_stmt(&mut self, node: &ExecuteStmt, ctx: &VisitContext) {}
    fn leave_execute_stmt(&mut self, node: &ExecuteStmt, ctx: &VisitContext) {}
    fn enter_call_stmt(&mut self, node: &CallStmt, ctx: &VisitContext) {}
    fn leave_call_stmt(&mut self, node: &CallStmt, ctx: &VisitContext) {}
    fn enter_if_stmt(&mut self, node: &IfStmt, ctx: &VisitContext) {}
    fn leave_if_stmt(&mut self, node: &IfStmt, ctx: &VisitContext) {}
    fn enter_elsif_stmt(&mut self, node: &ElsIfStmt, ctx: &VisitContext) {}
    fn leave_elsif_stmt(&mut self, node: &ElsIfStmt, ctx: &VisitContext) {}
    fn enter_else_stmt(&mut self, node: &ElseStmt, ctx: &VisitContext) {}
    fn leave_else_stmt(&mut self, node: &ElseStmt, ctx: &VisitContext) {}
    fn enter_while_stmt(&mut self, node: &WhileStmt, ctx: &VisitContext) {}
    fn leave_while_stmt(&mut self, node: &WhileStmt, ctx: &VisitContext) {}
    fn enter_for_stmt(&mut self, node: &ForStmt, ctx: &VisitContext) {}
    fn leave_for_stmt(&mut self, node: &ForStmt, ctx: &VisitContext) {}
    fn enter_for_each_stmt(&mut self, node: &ForEachStmt, ctx: &VisitContext) {}
    fn leave_for_each_stmt(&mut self, node: &ForEachStmt, ctx: &VisitContext) {}
    fn enter_try_stmt(&mut self, node: &TryStmt, ctx: &VisitContext) {}
    fn leave_try_stmt(&mut self, node: &TryStmt, ctx: &VisitContext) {}
    fn enter_except_stmt(&mut self, node: &ExceptStmt, ctx: &VisitContext) {}
    fn leave_except_stmt(&mut self, node: &ExceptStmt, ctx: &VisitContext) {}
    fn enter_goto_stmt(&mut self, node: &GotoStmt, ctx: &VisitContext) {}
    fn enter_label_stmt(&mut self, node: &LabelStmt, ctx: &VisitContext) {}

    // Preprocessor
    fn enter_prep_if_inst(&mut self, node: &PrepIfInst, ctx: &VisitContext) {}
    fn leave_prep_if_inst(&mut self, node: &PrepIfInst, ctx: &VisitContext) {}
    fn enter_prep_elsif_inst(&mut self, node: &PrepElsIfInst, ctx: &VisitContext) {}
    fn leave_prep_elsif_inst(&mut self, node: &PrepElsIfInst, ctx: &VisitContext) {}
    fn enter_prep_else_inst(&mut self, node: &PrepElseInst, ctx: &VisitContext) {}
    fn enter_prep_endif_inst(&mut self, node: &PrepEndIfInst, ctx: &VisitContext) {}
    fn enter_prep_region_inst(&mut self, node: &PrepRegionInst, ctx: &VisitContext) {}
    fn enter_prep_end_region_inst(&mut self, node: &PrepEndRegionInst, ctx: &VisitContext) {}
    fn enter_prep_expr(&mut self, node: &PrepExpr, ctx: &VisitContext) {}
    fn leave_prep_expr(&mut self, node: &PrepExpr, ctx: &VisitContext) {}
    fn enter_prep_binary_expr(&mut self, node: &PrepBinaryExpr, ctx: &VisitContext) {}
    fn leave_prep_binary_expr(&mut self, node: &PrepBinaryExpr, ctx: &VisitContext) {}
    fn enter_prep_not_expr(&mut self, node: &PrepNotExpr, ctx: &VisitContext) {}
    fn leave_prep_not_expr(&mut self, node: &PrepNotExpr, ctx: &VisitContext) {}
    fn enter_prep_sym_expr(&mut self, node: &PrepSymExpr, ctx: &VisitContext) {}
    fn enter_prep_paren_expr(&mut self, node: &PrepParenExpr, ctx: &VisitContext) {}
    fn leave_prep_paren_expr(&mut self, node: &PrepParenExpr, ctx: &VisitContext) {}
}

/// A plugin that closes into diagnostic issues.
pub trait Check: Plugin {
    /// Drains the accumulated issues, in visit order.
    fn close(&mut self) -> Vec<Issue>;
}

/// Fires a hook on every plugin, isolating panics.
macro_rules! fire {
    ($self:ident, $hook:ident, $node:expr) => {{
        let ctx = &$self.ctx;
        for plugin in $self.plugins.iter_mut() {
            let outcome = catch_unwind(AssertUnwindSafe(|| plugin.$hook($node, ctx)));
            if outcome.is_err() {
                tracing::warn!(
                    plugin = plugin.name(),
                    hook = stringify!($hook),
                    "plugin callback panicked; continuing with the next plugin"
                );
            }
        }
    }};
}

/// Tree walker dispatching enter/leave events to registered plugins.
pub struct Visitor<'p> {
    plugins: Vec<&'p mut dyn Plugin>,
    ctx: VisitContext,
}

impl<'p> Visitor<'p> {
    /// Creates a visitor over the given plugins. Events fire in registration
    /// order.
    pub fn new(plugins: Vec<&'p mut dyn Plugin>) -> Self {
        Visitor { plugins, ctx: VisitContext::default() }
    }

    /// Walks a module. The ancestor stack is empty again when this returns.
    pub fn walk(&mut self, module: &Module) {
        fire!(self, enter_module, module);
        self.push(NodeTag::Module);
        for decl in &module.decls {
            self.visit_decl(decl);
        }
        for auto in &module.auto {
            fire!(self, enter_auto_decl, auto);
        }
        for stmt in &module.body {
            self.visit_stmt(stmt);
        }
        self.pop(NodeTag::Module);
        fire!(self, leave_module, module);
        debug_assert!(self.ctx.stack.is_empty(), "ancestor stack not empty after traversal");
    }

    fn push(&mut self, tag: NodeTag) {
        *self.ctx.counters.entry(tag).or_insert(0) += 1;
        self.ctx.stack.push(tag);
    }

    fn pop(&mut self, tag: NodeTag) {
        let popped = self.ctx.stack.pop();
        debug_assert_eq!(popped, Some(tag), "unbalanced visitor stack");
        if let Some(count) = self.ctx.counters.get_mut(&tag) {
            *count -= 1;
        }
    }

    fn visit_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::VarModList(node) => {
                fire!(self, enter_var_mod_list_decl, node);
                self.push(NodeTag::VarModListDecl);
                for var in &node.list {
                    fire!(self, enter_var_mod_decl, var);
                }
                self.pop(NodeTag::VarModListDecl);
                fire!(self, leave_var_mod_list_decl, node);
            }
            Decl::Method(node) => self.visit_method_decl(node),
            Decl::Prep(inst) => self.visit_prep_inst(inst),
        }
    }

    fn visit_method_decl(&mut self, node: &MethodDecl) {
        fire!(self, enter_method_decl, node);
        self.push(NodeTag::MethodDecl);
        self.visit_sign(&node.sign);
        for var in &node.vars {
            fire!(self, enter_var_loc_decl, var);
        }
        for auto in &node.auto {
            fire!(self, enter_auto_decl, auto);
        }
        for stmt in &node.body {
            self.visit_stmt(stmt);
        }
        self.pop(NodeTag::MethodDecl);
        fire!(self, leave_method_decl, node);
    }

    fn visit_sign(&mut self, sign: &Sign) {
        match sign {
            Sign::Proc(node) => {
                fire!(self, enter_proc_sign, node);
                self.push(NodeTag::ProcSign);
                for param in &node.params {
                    self.visit_param(param);
                }
                self.pop(NodeTag::ProcSign);
                fire!(self, leave_proc_sign, node);
            }
            Sign::Func(node) => {
                fire!(self, enter_func_sign, node);
                self.push(NodeTag::FuncSign);
                for param in &node.params {
                    self.visit_param(param);
                }
                self.pop(NodeTag::FuncSign);
                fire!(self, leave_func_sign, node);
            }
        }
    }

    fn visit_param(&mut self, node: &ParamDecl) {
        fire!(self, enter_param_decl, node);
        self.push(NodeTag::ParamDecl);
        if let Some(value) = &node.value {
            self.visit_expr(value);
        }
        self.pop(NodeTag::ParamDecl);
        fire!(self, leave_param_decl, node);
    }

    /// Brackets a statement-level expression root with `enter_expr` /
    /// `leave_expr` around the ordinary traversal.
    fn visit_expr_root(&mut self, expr: &Expr) {
        fire!(self, enter_expr, expr);
        self.visit_expr(expr);
        fire!(self, leave_expr, expr);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Basic(node) => fire!(self, enter_basic_lit_expr, node),
            Expr::Ident(node) => self.visit_ident_expr(node),
            Expr::Unary(node) => {
                fire!(self, enter_unary_expr, node);
                self.push(NodeTag::UnaryExpr);
                self.visit_expr(&node.operand);
                self.pop(NodeTag::UnaryExpr);
                fire!(self, leave_unary_expr, node);
            }
            Expr::Binary(node) => {
                fire!(self, enter_binary_expr, node);
                self.push(NodeTag::BinaryExpr);
                self.visit_expr(&node.left);
                self.visit_expr(&node.right);
                self.pop(NodeTag::BinaryExpr);
                fire!(self, leave_binary_expr, node);
            }
            Expr::Not(node) => {
                fire!(self, enter_not_expr, node);
                self.push(NodeTag::NotExpr);
                self.visit_expr(&node.expr);
                self.pop(NodeTag::NotExpr);
                fire!(self, leave_not_expr, node);
            }
            Expr::Paren(node) => {
                fire!(self, enter_paren_expr, node);
                self.push(NodeTag::ParenExpr);
                self.visit_expr(&node.expr);
                self.pop(NodeTag::ParenExpr);
                fire!(self, leave_paren_expr, node);
            }
            Expr::Ternary(node) => {
                fire!(self, enter_ternary_expr, node);
                self.push(NodeTag::TernaryExpr);
                self.visit_expr(&node.cond);
                self.visit_expr(&node.then_expr);
                self.visit_expr(&node.else_expr);
                for item in &node.tail {
                    self.visit_tail_item(item);
                }
                self.pop(NodeTag::TernaryExpr);
                fire!(self, leave_ternary_expr, node);
            }
            Expr::New(node) => {
                fire!(self, enter_new_expr, node);
                self.push(NodeTag::NewExpr);
                for arg in node.args.iter().flatten() {
                    self.visit_expr(arg);
                }
                self.pop(NodeTag::NewExpr);
                fire!(self, leave_new_expr, node);
            }
            Expr::String(node) => {
                fire!(self, enter_string_expr, node);
                self.push(NodeTag::StringExpr);
                for fragment in &node.list {
                    fire!(self, enter_basic_lit_expr, fragment);
                }
                self.pop(NodeTag::StringExpr);
                fire!(self, leave_string_expr, node);
            }
        }
    }

    fn visit_ident_expr(&mut self, node: &IdentExpr) {
        fire!(self, enter_ident_expr, node);
        self.push(NodeTag::IdentExpr);
        if let Some(args) = &node.args {
            for arg in args.iter().flatten() {
                self.visit_expr(arg);
            }
        }
        for item in &node.tail {
            self.visit_tail_item(item);
        }
        self.pop(NodeTag::IdentExpr);
        fire!(self, leave_ident_expr, node);
    }

    fn visit_tail_item(&mut self, item: &TailItem) {
        match item {
            TailItem::Field(node) => {
                fire!(self, enter_field_expr, node);
                self.push(NodeTag::FieldExpr);
                if let Some(args) = &node.args {
                    for arg in args.iter().flatten() {
                        self.visit_expr(arg);
                    }
                }
                self.pop(NodeTag::FieldExpr);
                fire!(self, leave_field_expr, node);
            }
            TailItem::Index(node) => {
                fire!(self, enter_index_expr, node);
                self.push(NodeTag::IndexExpr);
                self.visit_expr(&node.expr);
                self.pop(NodeTag::IndexExpr);
                fire!(self, leave_index_expr, node);
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(node) => {
                fire!(self, enter_assign_stmt, node);
                self.push(NodeTag::AssignStmt);
                self.visit_ident_expr(&node.left);
                self.visit_expr_root(&node.right);
                self.pop(NodeTag::AssignStmt);
                fire!(self, leave_assign_stmt, node);
            }
            Stmt::Return(node) => {
                fire!(self, enter_return_stmt, node);
                self.push(NodeTag::ReturnStmt);
                if let Some(expr) = &node.expr {
                    self.visit_expr_root(expr);
                }
                self.pop(NodeTag::ReturnStmt);
                fire!(self, leave_return_stmt, node);
            }
            Stmt::Break(node) => fire!(self, enter_break_stmt, node),
            Stmt::Continue(node) => fire!(self, enter_continue_stmt, node),
            Stmt::Raise(node) => {
                fire!(self, enter_raise_stmt, node);
                self.push(NodeTag::RaiseStmt);
                if let Some(expr) = &node.expr {
                    self.visit_expr_root(expr);
                }
                self.pop(NodeTag::RaiseStmt);
                fire!(self, leave_raise_stmt, node);
            }
            Stmt::Execute(node) => {
                fire!(self, enter_execute_stmt, node);
                self.push(NodeTag::ExecuteStmt);
                self.visit_expr_root(&node.expr);
                self.pop(NodeTag::ExecuteStmt);
                fire!(self, leave_execute_stmt, node);
            }
            Stmt::Call(node) => {
                fire!(self, enter_call_stmt, node);
                self.push(NodeTag::CallStmt);
                self.visit_ident_expr(&node.ident);
                self.pop(NodeTag::CallStmt);
                fire!(self, leave_call_stmt, node);
            }
            Stmt::If(node) => {
                fire!(self, enter_if_stmt, node);
                self.push(NodeTag::IfStmt);
                self.visit_expr_root(&node.cond);
                for stmt in &node.then_part {
                    self.visit_stmt(stmt);
                }
                if let Some(elsifs) = &node.elsifs {
                    for elsif in elsifs {
                        fire!(self, enter_elsif_stmt, elsif);
                        self.push(NodeTag::ElsIfStmt);
                        self.visit_expr_root(&elsif.cond);
                        for stmt in &elsif.then_part {
                            self.visit_stmt(stmt);
                        }
                        self.pop(NodeTag::ElsIfStmt);
                        fire!(self, leave_elsif_stmt, elsif);
                    }
                }
                if let Some(else_part) = &node.else_part {
                    fire!(self, enter_else_stmt, else_part);
                    self.push(NodeTag::ElseStmt);
                    for stmt in &else_part.body {
                        self.visit_stmt(stmt);
                    }
                    self.pop(NodeTag::ElseStmt);
                    fire!(self, leave_else_stmt, else_part);
                }
                self.pop(NodeTag::IfStmt);
                fire!(self, leave_if_stmt, node);
            }
            Stmt::While(node) => {
                fire!(self, enter_while_stmt, node);
                self.push(NodeTag::WhileStmt);
                self.visit_expr_root(&node.cond);
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                self.pop(NodeTag::WhileStmt);
                fire!(self, leave_while_stmt, node);
            }
            Stmt::For(node) => {
                fire!(self, enter_for_stmt, node);
                self.push(NodeTag::ForStmt);
                self.visit_ident_expr(&node.ident);
                self.visit_expr_root(&node.from);
                self.visit_expr_root(&node.to);
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                self.pop(NodeTag::ForStmt);
                fire!(self, leave_for_stmt, node);
            }
            Stmt::ForEach(node) => {
                fire!(self, enter_for_each_stmt, node);
                self.push(NodeTag::ForEachStmt);
                self.visit_ident_expr(&node.ident);
                self.visit_expr_root(&node.collection);
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                self.pop(NodeTag::ForEachStmt);
                fire!(self, leave_for_each_stmt, node);
            }
            Stmt::Try(node) => {
                fire!(self, enter_try_stmt, node);
                self.push(NodeTag::TryStmt);
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                fire!(self, enter_except_stmt, &node.except);
                self.push(NodeTag::ExceptStmt);
                for stmt in &node.except.body {
                    self.visit_stmt(stmt);
                }
                self.pop(NodeTag::ExceptStmt);
                fire!(self, leave_except_stmt, &node.except);
                self.pop(NodeTag::TryStmt);
                fire!(self, leave_try_stmt, node);
            }
            Stmt::Goto(node) => fire!(self, enter_goto_stmt, node),
            Stmt::Label(node) => fire!(self, enter_label_stmt, node),
            Stmt::Prep(inst) => self.visit_prep_inst(inst),
        }
    }

    fn visit_prep_inst(&mut self, inst: &PrepInst) {
        match inst {
            PrepInst::If(node) => {
                fire!(self, enter_prep_if_inst, node);
                self.push(NodeTag::PrepIfInst);
                self.visit_prep_expr_root(&node.cond);
                self.pop(NodeTag::PrepIfInst);
                fire!(self, leave_prep_if_inst, node);
            }
            PrepInst::ElsIf(node) => {
                fire!(self, enter_prep_elsif_inst, node);
                self.push(NodeTag::PrepElsIfInst);
                self.visit_prep_expr_root(&node.cond);
                self.pop(NodeTag::PrepElsIfInst);
                fire!(self, leave_prep_elsif_inst, node);
            }
            PrepInst::Else(node) => fire!(self, enter_prep_else_inst, node),
            PrepInst::EndIf(node) => fire!(self, enter_prep_endif_inst, node),
            PrepInst::Region(node) => fire!(self, enter_prep_region_inst, node),
            PrepInst::EndRegion(node) => fire!(self, enter_prep_end_region_inst, node),
        }
    }

    fn visit_prep_expr_root(&mut self, expr: &PrepExpr) {
        fire!(self, enter_prep_expr, expr);
        self.visit_prep_expr(expr);
        fire!(self, leave_prep_expr, expr);
    }

    fn visit_prep_expr(&mut self, expr: &PrepExpr) {
        match expr {
            PrepExpr::Binary(node) => {
                fire!(self, enter_prep_binary_expr, node);
                self.push(NodeTag::PrepBinaryExpr);
                self.visit_prep_expr(&node.left);
                self.visit_prep_expr(&node.right);
                self.pop(NodeTag::PrepBinaryExpr);
                fire!(self, leave_prep_binary_expr, node);
            }
            PrepExpr::Not(node) => {
                fire!(self, enter_prep_not_expr, node);
                self.push(NodeTag::PrepNotExpr);
                self.visit_prep_expr(&node.expr);
                self.pop(NodeTag::PrepNotExpr);
                fire!(self, leave_prep_not_expr, node);
            }
            PrepExpr::Sym(node) => fire!(self, enter_prep_sym_expr, node),
            PrepExpr::Paren(node) => {
                fire!(self, enter_prep_paren_expr, node);
                self.push(NodeTag::PrepParenExpr);
                self.visit_prep_expr(&node.expr);
                self.pop(NodeTag::PrepParenExpr);
                fire!(self, leave_prep_paren_expr, node);
            }
        }
    }
}

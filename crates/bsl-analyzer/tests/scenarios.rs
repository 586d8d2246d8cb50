//! End-to-end plugin scenarios over parsed modules.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use bsl_analyzer::plugins::default_checks;
use bsl_analyzer::{Plugin, VisitContext, Visitor};
use bsl_ast::{Module, WhileStmt};
use bsl_context::ModuleKind;
use bsl_parser::Parser;
use bsl_report::{Issue, Kind, Severity};

fn analyze_with(src: &str, strict_params: bool) -> Vec<Issue> {
    let parsed = Parser::new(src, ModuleKind::Unknown).parse().expect("module should parse");
    let source: Arc<str> = Arc::from(src);
    let mut checks = default_checks("Module.bsl", &source, strict_params);

    let plugins: Vec<&mut dyn Plugin> =
        checks.iter_mut().map(|check| &mut **check as &mut dyn Plugin).collect();
    let mut visitor = Visitor::new(plugins);
    visitor.walk(&parsed.module);
    drop(visitor);

    checks.iter_mut().flat_map(|check| check.close()).collect()
}

fn analyze(src: &str) -> Vec<Issue> {
    analyze_with(src, false)
}

// ===== Closing comments =====

#[test]
fn closing_comment_positive() {
    let src = "Function Test() Export\n  Return 1;\nEndFunction // Test()";
    assert_eq!(analyze(src), vec![]);
}

#[test]
fn closing_comment_wrong_case() {
    let src = "Function Test() Export\n  Return 1;\nEndFunction // test()";
    let issues = analyze(src);
    assert_eq!(issues.len(), 1);
    let issue = &issues[0];
    assert_eq!(issue.kind, Kind::CodeSmell);
    assert_eq!(issue.severity, Severity::Info);
    assert_eq!(issue.message, "Method \"Test()\" has an incorrect closing comment.");
    assert_eq!(issue.location.start_line, 3);
}

#[test]
fn closing_comment_missing_parens() {
    let src = "Function Test() Export\n  Return 1;\nEndFunction // Test";
    assert_eq!(analyze(src).len(), 1);
}

#[test]
fn closing_comment_absent_is_not_reported() {
    let src = "Function Test() Export\n  Return 1;\nEndFunction";
    assert_eq!(analyze(src), vec![]);
}

// ===== Regions =====

#[test]
fn region_closing_comment_match() {
    let src = "#Region Public\n#EndRegion // Public\n";
    assert_eq!(analyze(src), vec![]);
}

#[test]
fn region_closing_comment_mismatch() {
    let src = "#Region Public\n#EndRegion // public\n";
    let issues = analyze(src);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "Region \"Public\" has an incorrect closing comment.");
    assert_eq!(issues[0].location.start_line, 2);
}

// ===== Unused variables =====

#[test]
fn unused_variable_points_at_last_assignment() {
    let src = "Procedure P()\n  Var A;\n  A = 1;\nEndProcedure";
    let issues = analyze(src);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("\"A\""));
    assert_eq!(issues[0].location.start_line, 3);
    assert_eq!(issues[0].location.start_col, 3);
}

#[test]
fn loop_only_use_is_still_used() {
    let src = "Procedure P()\n  Var A; A = 0;\n  While A < 3 Do\n    A = A + 1;\n  EndDo;\nEndProcedure";
    assert_eq!(analyze(src), vec![]);
}

#[test]
fn read_parameters_are_quiet_by_default() {
    let src = "Procedure P(X)\n  Обработать(X);\nEndProcedure";
    assert_eq!(analyze(src), vec![]);

    let src = "Procedure P(X)\nEndProcedure";
    assert_eq!(analyze(src), vec![]);
}

#[test]
fn strict_mode_reports_untouched_parameters() {
    let src = "Procedure P(X)\nEndProcedure";
    let issues = analyze_with(src, true);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("Unused parameter"));
}

#[test]
fn overwritten_by_value_parameter_is_reported() {
    let src = "Procedure P(Val X)\n  X = 1;\nEndProcedure";
    let issues = analyze(src);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("Unused parameter \"X\""));
}

// ===== Duplicate conditions =====

#[test]
fn duplicate_elsif_condition() {
    let src = "If X = 1 Then\nElsIf X = 2 Then\nElsIf X = 1 Then\nEndIf";
    let issues = analyze(src);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "Duplicate condition");
    assert_eq!(issues[0].location.start_line, 3);
}

#[test]
fn distinct_conditions_pass() {
    let src = "If X = 1 Then\nElsIf X = 2 Then\nElsIf X = 3 Then\nEndIf";
    assert_eq!(analyze(src), vec![]);
}

#[test]
fn nested_if_keeps_its_own_condition_set() {
    let src = "If X = 1 Then\n  If X = 1 Then\n  EndIf;\nElsIf X = 1 Then\nEndIf";
    // only the outer elsif duplicates the outer condition
    let issues = analyze(src);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].location.start_line, 4);
}

// ===== Concatenation =====

#[test]
fn chained_string_concatenation_is_reported() {
    let issues = analyze("S = \"a\" + B + \"c\" + D;");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rule, "string-concatenation");
}

#[test]
fn single_concatenation_passes() {
    assert_eq!(analyze("S = \"a\" + B;"), vec![]);
}

#[test]
fn non_string_addition_passes() {
    assert_eq!(analyze("S = A + B + C;"), vec![]);
}

// ===== Empty except =====

#[test]
fn empty_except_block() {
    let src = "Try\n  A = 1;\nExcept\nEndTry";
    let issues = analyze(src);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rule, "empty-except");
}

#[test]
fn handled_except_block_passes() {
    let src = "Try\n  A = 1;\nExcept\n  B = 2;\nEndTry";
    assert_eq!(analyze(src), vec![]);
}

// ===== Structure constructor =====

#[test]
fn structure_constructor_with_value_list() {
    let issues = analyze("С = Новый Структура(\"А, Б\", 1, 2);");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rule, "structure-constructor");
}

#[test]
fn structure_constructor_with_keys_only_passes() {
    assert_eq!(analyze("С = Новый Структура(\"А, Б\");"), vec![]);
}

// ===== Commented-out code =====

#[test]
fn commented_out_block_reports_once() {
    let src = "//x = 1\n//y = 2\nА = 1; // обычный комментарий\n";
    let issues = analyze(src);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rule, "commented-out-code");
    assert_eq!(issues[0].location.start_line, 1);
}

#[test]
fn keyword_comment_is_flagged() {
    let issues = analyze("//Возврат Значение;\n");
    assert_eq!(issues.len(), 1);
}

// ===== Visitor invariants =====

#[derive(Default)]
struct Balance {
    enters: usize,
    leaves: usize,
    max_loop_depth: u32,
}

impl Plugin for Balance {
    fn name(&self) -> &'static str {
        "balance"
    }

    fn enter_while_stmt(&mut self, _node: &WhileStmt, ctx: &VisitContext) {
        self.enters += 1;
        self.max_loop_depth = self.max_loop_depth.max(ctx.count(bsl_ast::NodeTag::WhileStmt) + 1);
    }

    fn leave_while_stmt(&mut self, _node: &WhileStmt, _ctx: &VisitContext) {
        self.leaves += 1;
    }

    fn enter_module(&mut self, _node: &Module, ctx: &VisitContext) {
        // the node being entered is not yet on the stack
        assert!(ctx.stack().is_empty());
    }

    fn leave_module(&mut self, _node: &Module, ctx: &VisitContext) {
        assert!(ctx.stack().is_empty());
    }
}

#[test]
fn enter_and_leave_are_balanced() {
    let src = "Пока А Цикл\n  Пока Б Цикл\n    В = 1;\n  КонецЦикла;\nКонецЦикла;";
    let parsed = Parser::new(src, ModuleKind::Unknown).parse().unwrap();

    let mut balance = Balance::default();
    let mut visitor = Visitor::new(vec![&mut balance]);
    visitor.walk(&parsed.module);
    drop(visitor);

    assert_eq!(balance.enters, 2);
    assert_eq!(balance.leaves, 2);
    assert_eq!(balance.max_loop_depth, 2);
}

#[derive(Default)]
struct EventLog {
    events: Vec<&'static str>,
}

impl Plugin for EventLog {
    fn name(&self) -> &'static str {
        "event-log"
    }

    fn enter_module(&mut self, _n: &Module, _c: &VisitContext) {
        self.events.push("enter_module");
    }
    fn leave_module(&mut self, _n: &Module, _c: &VisitContext) {
        self.events.push("leave_module");
    }
    fn enter_auto_decl(&mut self, _n: &bsl_ast::AutoDecl, _c: &VisitContext) {
        self.events.push("enter_auto_decl");
    }
    fn enter_assign_stmt(&mut self, _n: &bsl_ast::AssignStmt, _c: &VisitContext) {
        self.events.push("enter_assign_stmt");
    }
    fn leave_assign_stmt(&mut self, _n: &bsl_ast::AssignStmt, _c: &VisitContext) {
        self.events.push("leave_assign_stmt");
    }
    fn enter_ident_expr(&mut self, _n: &bsl_ast::IdentExpr, _c: &VisitContext) {
        self.events.push("enter_ident_expr");
    }
    fn leave_ident_expr(&mut self, _n: &bsl_ast::IdentExpr, _c: &VisitContext) {
        self.events.push("leave_ident_expr");
    }
    fn enter_expr(&mut self, _n: &bsl_ast::Expr, _c: &VisitContext) {
        self.events.push("enter_expr");
    }
    fn leave_expr(&mut self, _n: &bsl_ast::Expr, _c: &VisitContext) {
        self.events.push("leave_expr");
    }
    fn enter_basic_lit_expr(&mut self, _n: &bsl_ast::BasicLitExpr, _c: &VisitContext) {
        self.events.push("enter_basic_lit_expr");
    }
}

#[test]
fn events_fire_in_canonical_order() {
    let parsed = Parser::new("А = 1;", ModuleKind::Unknown).parse().unwrap();

    let mut log = EventLog::default();
    let mut visitor = Visitor::new(vec![&mut log]);
    visitor.walk(&parsed.module);
    drop(visitor);

    // declarations, then module auto variables, then the body; the
    // assignment target is an ordinary identifier visit, the right side is
    // an expression root
    assert_eq!(
        log.events,
        vec![
            "enter_module",
            "enter_auto_decl",
            "enter_assign_stmt",
            "enter_ident_expr",
            "leave_ident_expr",
            "enter_expr",
            "enter_basic_lit_expr",
            "leave_expr",
            "leave_assign_stmt",
            "leave_module",
        ]
    );
}

struct Panicky;

impl Plugin for Panicky {
    fn name(&self) -> &'static str {
        "panicky"
    }

    fn enter_module(&mut self, _node: &Module, _ctx: &VisitContext) {
        panic!("deliberate failure");
    }
}

#[test]
fn a_panicking_plugin_does_not_stop_the_others() {
    let src = "Пока А Цикл\nКонецЦикла;";
    let parsed = Parser::new(src, ModuleKind::Unknown).parse().unwrap();

    let mut panicky = Panicky;
    let mut balance = Balance::default();
    let mut visitor = Visitor::new(vec![&mut panicky, &mut balance]);
    visitor.walk(&parsed.module);
    drop(visitor);

    assert_eq!(balance.enters, 1);
    assert_eq!(balance.leaves, 1);
}

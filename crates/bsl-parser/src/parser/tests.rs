#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use bsl_ast::{Decl, Expr, ItemDecl, Sign, Stmt, TailItem};
use bsl_context::ModuleKind;
use bsl_token::{Keyword, TokenKind};

use crate::error::ParseError;
use crate::parser::{Parsed, Parser};

fn parse(src: &str) -> Parsed {
    Parser::new(src, ModuleKind::Unknown).parse().expect("module should parse")
}

fn parse_err(src: &str) -> ParseError {
    Parser::new(src, ModuleKind::Unknown).parse().expect_err("module should not parse")
}

#[test]
fn parses_plain_forms() {
    parse("var x; x = x + 1");
    parse("var x; x = +x + -1");
    parse("var x; y = ?(x, 1, 2).y(1)");
    parse("var x; y = x[0]");
    parse("var x; y = x[0].z()");
    parse("var x; y = x[0].z[1].q.q()");
    parse("var x; x.y = x");
}

#[test]
fn module_shape_and_places() {
    let parsed = parse("var x; x = x + 1");
    let module = parsed.module;
    assert_eq!(module.decls.len(), 1);
    assert_eq!(module.auto.len(), 0);
    assert_eq!(module.body.len(), 1);

    let stmt = &module.body[0];
    assert_eq!(stmt.place().beg_pos, 7);
    assert_eq!(stmt.place().end_pos, 16);
}

#[test]
fn syntax_errors_are_fatal() {
    assert!(matches!(parse_err("x = / + 1"), ParseError::Expected { .. }));
    assert!(matches!(parse_err("x = + + 1"), ParseError::Expected { .. }));
    assert!(matches!(parse_err("x = * 1"), ParseError::Expected { .. }));
    assert!(matches!(parse_err("x = = 1"), ParseError::Expected { .. }));
    assert!(matches!(parse_err(" = 1"), ParseError::Expected { .. }));
}

#[test]
fn undeclared_method_is_deferred_per_call_site() {
    let parsed = parse("Тест(); Тест();");
    assert_eq!(parsed.diagnostics.len(), 2);
    for d in &parsed.diagnostics {
        assert_eq!(d.text, "Undeclared method \"Тест\"");
    }
    assert_eq!(parsed.diagnostics[0].pos, 0);
    assert_eq!(parsed.diagnostics[1].pos, "Тест(); ".len());
}

#[test]
fn forward_call_is_patched_by_the_declaration() {
    let parsed = parse(
        "Процедура А()\n    Б();\nКонецПроцедуры\nПроцедура Б()\nКонецПроцедуры",
    );
    assert!(parsed.diagnostics.is_empty());

    // the call in А resolved to the same item the declaration of Б filled in
    let module = &parsed.module;
    let Decl::Method(a) = &module.decls[0] else { panic!("expected method") };
    let Stmt::Call(call) = &a.body[0] else { panic!("expected call") };
    let head = module.symbols.get(call.ident.head);
    assert_eq!(head.name, "Б");
    assert!(matches!(head.decl, Some(ItemDecl::Method { func: false, .. })));
}

#[test]
fn redeclaration_is_fatal() {
    assert!(matches!(parse_err("Перем А; Перем А;"), ParseError::AlreadyDeclared { .. }));
    assert!(matches!(
        parse_err("Процедура А()\nКонецПроцедуры\nПроцедура А()\nКонецПроцедуры"),
        ParseError::AlreadyDeclared { .. }
    ));
    assert!(matches!(
        parse_err("Процедура А(П, П)\nКонецПроцедуры"),
        ParseError::AlreadyDeclared { .. }
    ));
}

#[test]
fn var_after_method_is_fatal() {
    let err = parse_err("Процедура А()\nКонецПроцедуры\nПерем Б;");
    assert!(matches!(err, ParseError::VarAfterMethod { .. }));
}

#[test]
fn interface_lists_exports_in_source_order() {
    let parsed = parse(
        "Перем В1 Экспорт;\n\
         Процедура П1() Экспорт\nКонецПроцедуры\n\
         Процедура П2()\nКонецПроцедуры\n\
         Функция Ф1() Экспорт\n    Возврат 0;\nКонецФункции",
    );
    let module = &parsed.module;
    let names: Vec<&str> =
        module.interface.iter().map(|&id| module.symbols.get(id).name.as_str()).collect();
    assert_eq!(names, vec!["В1", "П1", "Ф1"]);
}

#[test]
fn auto_variables_are_collected_in_order() {
    let parsed = parse(
        "Процедура П()\n\
         \tМакс = 0;\n\
         \tДля Индекс = 0 По 5 Цикл\n\
         \t\tДля Каждого Элемент Из Индекс Цикл\n\
         \t\tКонецЦикла;\n\
         \tКонецЦикла;\n\
         КонецПроцедуры",
    );
    let Decl::Method(method) = &parsed.module.decls[0] else { panic!("expected method") };
    let names: Vec<&str> = method.auto.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Макс", "Индекс", "Элемент"]);
}

#[test]
fn module_body_auto_variables() {
    let parsed = parse("Значение = 1;");
    assert_eq!(parsed.module.auto.len(), 1);
    assert_eq!(parsed.module.auto[0].name, "Значение");
    assert!(parsed.module.body.len() == 1);
}

#[test]
fn scope_chain_resolves_locals() {
    let parsed = parse(
        "Процедура П(Пар)\n    Перем Лок;\n    Лок = Пар;\nКонецПроцедуры",
    );
    let Decl::Method(method) = &parsed.module.decls[0] else { panic!("expected method") };
    let Stmt::Assign(assign) = &method.body[0] else { panic!("expected assignment") };
    let left = parsed.module.symbols.get(assign.left.head);
    assert_eq!(left.name, "Лок");
    assert!(matches!(left.decl, Some(ItemDecl::VarLoc { .. })));

    let Expr::Ident(right) = &assign.right else { panic!("expected ident") };
    let right_item = parsed.module.symbols.get(right.head);
    assert_eq!(right_item.name, "Пар");
    assert!(matches!(right_item.decl, Some(ItemDecl::Param { by_val: false, .. })));
}

#[test]
fn return_value_only_inside_functions() {
    let parsed = parse("Функция Ф()\n    Возврат 1;\nКонецФункции");
    let Decl::Method(method) = &parsed.module.decls[0] else { panic!("expected method") };
    assert!(matches!(method.sign, Sign::Func(_)));
    let Stmt::Return(ret) = &method.body[0] else { panic!("expected return") };
    assert!(ret.expr.is_some());

    // a value after a procedure-level return does not parse
    assert!(parse_err("Процедура П()\n    Возврат 1;\nКонецПроцедуры").to_string().contains("expected"));

    // a bare return in a procedure is fine
    parse("Процедура П()\n    Возврат;\nКонецПроцедуры");
}

#[test]
fn string_fragments_fold_into_one_expression() {
    let parsed = parse("С = \"а\" \"б\";");
    let Stmt::Assign(assign) = &parsed.module.body[0] else { panic!("expected assignment") };
    let Expr::String(s) = &assign.right else { panic!("expected string expr") };
    assert_eq!(s.list.len(), 2);

    let parsed = parse("С = \"начало\n|середина\n|конец\";");
    let Stmt::Assign(assign) = &parsed.module.body[0] else { panic!("expected assignment") };
    let Expr::String(s) = &assign.right else { panic!("expected string expr") };
    let kinds: Vec<TokenKind> = s.list.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![TokenKind::StringBeg, TokenKind::StringMid, TokenKind::StringEnd]);
}

#[test]
fn empty_argument_positions_become_none() {
    let parsed = parse("Ф(, 1,);");
    let Stmt::Call(call) = &parsed.module.body[0] else { panic!("expected call") };
    let args = call.ident.args.as_ref().unwrap();
    assert_eq!(args.len(), 3);
    assert!(args[0].is_none());
    assert!(args[1].is_some());
    assert!(args[2].is_none());
}

#[test]
fn member_names_may_be_keywords() {
    let parsed = parse("х = Объект.Новый().Выполнить;");
    let Stmt::Assign(assign) = &parsed.module.body[0] else { panic!("expected assignment") };
    let Expr::Ident(ident) = &assign.right else { panic!("expected ident") };
    assert_eq!(ident.tail.len(), 2);
    let TailItem::Field(first) = &ident.tail[0] else { panic!("expected field") };
    assert_eq!(first.name, "Новый");
    assert!(first.args.is_some());
    let TailItem::Field(second) = &ident.tail[1] else { panic!("expected field") };
    assert_eq!(second.name, "Выполнить");
    assert!(second.args.is_none());
}

#[test]
fn new_expr_forms() {
    let parsed = parse("П = Новый Массив(10);");
    let Stmt::Assign(assign) = &parsed.module.body[0] else { panic!("expected assignment") };
    let Expr::New(new) = &assign.right else { panic!("expected new") };
    assert_eq!(new.name.as_deref(), Some("Массив"));
    assert_eq!(new.args.len(), 1);

    let parsed = parse("М = Новый (Тип, Параметры);");
    let Stmt::Assign(assign) = &parsed.module.body[0] else { panic!("expected assignment") };
    let Expr::New(new) = &assign.right else { panic!("expected new") };
    assert!(new.name.is_none());
    assert_eq!(new.args.len(), 2);

    assert!(matches!(parse_err("х = Новый;"), ParseError::Expected { .. }));
}

#[test]
fn preprocessor_in_statement_position() {
    let parsed = parse(
        "#Область Публичный\n\
         Процедура П()\n\
         \t#Если Сервер Тогда\n\
         \tА = 1;\n\
         \t#КонецЕсли\n\
         КонецПроцедуры\n\
         #КонецОбласти",
    );
    assert!(parsed.diagnostics.is_empty());
    let module = &parsed.module;
    assert_eq!(module.decls.len(), 3); // region, method, endregion

    let Decl::Method(method) = &module.decls[1] else { panic!("expected method") };
    assert_eq!(method.body.len(), 3); // prep-if, assignment, prep-endif
}

#[test]
fn prep_symbols_report_existence() {
    let parsed = parse("#Если Сервер Или Нечто Тогда\n#КонецЕсли");
    let Decl::Prep(bsl_ast::PrepInst::If(prep_if)) = &parsed.module.decls[0] else {
        panic!("expected prep-if")
    };
    let bsl_ast::PrepExpr::Binary(or) = &prep_if.cond else { panic!("expected binary") };
    assert_eq!(or.operator, TokenKind::Keyword(Keyword::Or));
    let bsl_ast::PrepExpr::Sym(left) = &or.left else { panic!("expected symbol") };
    assert!(left.exist);
    let bsl_ast::PrepExpr::Sym(right) = &or.right else { panic!("expected symbol") };
    assert!(!right.exist);
}

#[test]
fn labels_and_goto() {
    let parsed = parse("~Метка:\nПерейти ~Метка;");
    let Stmt::Label(label) = &parsed.module.body[0] else { panic!("expected label") };
    assert_eq!(label.label, "Метка");
    let Stmt::Goto(goto) = &parsed.module.body[1] else { panic!("expected goto") };
    assert_eq!(goto.label, "Метка");
}

#[test]
fn form_module_context_is_visible() {
    let parsed = Parser::new("Закрыть();", ModuleKind::ClientApplicationForm)
        .parse()
        .expect("form module should parse");
    assert!(parsed.diagnostics.is_empty(), "built-in method should resolve");

    let parsed = Parser::new("Закрыть();", ModuleKind::Unknown).parse().unwrap();
    assert_eq!(parsed.diagnostics.len(), 1, "no context, call stays unresolved");
}

#[test]
fn unknown_directive_is_reported_and_skipped() {
    let parsed = parse("&Нигде\nПроцедура П()\nКонецПроцедуры");
    assert_eq!(parsed.diagnostics.len(), 1);
    assert!(parsed.diagnostics[0].text.contains("Нигде"));
    assert_eq!(parsed.module.decls.len(), 1);
}

#[test]
fn known_directive_attaches_to_the_method() {
    let parsed = parse("&НаСервере\nПроцедура П()\nКонецПроцедуры");
    let Decl::Method(method) = &parsed.module.decls[0] else { panic!("expected method") };
    let Sign::Proc(sign) = &method.sign else { panic!("expected procedure") };
    assert_eq!(sign.directive, Some(bsl_token::Directive::AtServer));
}

#[test]
fn every_place_is_ordered() {
    let parsed = parse(
        "Перем А;\n\
         Процедура П(Б)\n\
         \tЕсли Б > 0 Тогда\n\
         \t\tА = ?(Б = 1, \"один\", \"много\") + Б;\n\
         \tИначе\n\
         \t\tПока Б < 10 Цикл Б = Б + 1; КонецЦикла;\n\
         \tКонецЕсли;\n\
         КонецПроцедуры",
    );
    for decl in &parsed.module.decls {
        let place = decl.place();
        assert!(place.beg_pos <= place.end_pos);
        assert!(place.beg_line <= place.end_line);
    }
}

#[test]
fn statement_places_reparse_standalone() {
    let src = "Пока Истина Цикл\n\tА = 1;\nКонецЦикла;";
    let parsed = parse(src);
    let Stmt::While(while_stmt) = &parsed.module.body[0] else { panic!("expected while") };

    let slice = while_stmt.place.slice(src);
    assert_eq!(slice, "Пока Истина Цикл\n\tА = 1;\nКонецЦикла");
    let reparsed = parse(slice);
    assert!(matches!(reparsed.module.body[0], Stmt::While(_)));

    let src = "Если Х Тогда\nИначе\nКонецЕсли;";
    let parsed = parse(src);
    let Stmt::If(if_stmt) = &parsed.module.body[0] else { panic!("expected if") };
    let reparsed = parse(if_stmt.place.slice(src));
    assert!(matches!(reparsed.module.body[0], Stmt::If(_)));
}

#[test]
fn comments_survive_into_the_module() {
    let parsed = parse("А = 1; // присваивание\n// отдельная строка");
    assert_eq!(parsed.module.comments.len(), 2);
    assert_eq!(parsed.module.comments[&1].text, " присваивание");
}

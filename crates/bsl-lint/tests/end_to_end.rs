//! Full-run smoke test over a synthetic configuration dump.

use std::fs;
use std::path::PathBuf;

use bsl_lint::{Options, find_modules, run};
use bsl_report::sonar::GenericIssueReport;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bsl-lint-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("CommonModules/Ядро/Ext")).unwrap();
    dir
}

#[test]
fn run_merges_issues_and_skips_broken_modules() {
    let dir = scratch_dir("run");

    fs::write(
        dir.join("CommonModules/Ядро/Ext/Module.bsl"),
        "\u{feff}Процедура Тест()\n\tПерем Неиспользуемая;\n\tНеиспользуемая = 1;\nКонецПроцедуры // Тест()\n",
    )
    .unwrap();
    fs::write(dir.join("CommonModules/Ядро/Ext/Broken.bsl"), "Если Истина Тогда").unwrap();

    let summary = run(&dir, Options::default());
    assert_eq!(summary.modules, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.issues.len(), 1);
    assert!(summary.issues[0].message.contains("Неиспользуемая"));

    let report = GenericIssueReport::from_issues(&summary.issues);
    let json = report.to_json().unwrap();
    assert!(json.contains("\"engineId\": \"bsl-lint\""));
    assert!(json.contains("CODE_SMELL"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn module_discovery_is_case_insensitive() {
    let dir = scratch_dir("discovery");
    fs::write(dir.join("CommonModules/Ядро/Ext/Module.bsl"), "Перем А;").unwrap();
    fs::write(dir.join("CommonModules/Ядро/Ext/Upper.BSL"), "Перем Б;").unwrap();
    fs::write(dir.join("CommonModules/Ядро/Ext/notes.txt"), "не модуль").unwrap();

    let modules = find_modules(&dir);
    assert_eq!(modules.len(), 2);

    let _ = fs::remove_dir_all(&dir);
}

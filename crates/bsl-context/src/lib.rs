//! Global context registry.
//!
//! A static catalog of the built-in attributes and methods every module of a
//! given kind sees without declaring them: a form module has `ThisObject`,
//! `Items` and `Close()`, a document object module has `Ref` and `IsNew()`,
//! and so on. The parser consults the catalog once per module and installs
//! the entries into the module scope before parsing begins.
//!
//! Each entry carries both the English and the Russian name; both are
//! installed under their lowercased forms and share one arena item, so either
//! spelling resolves to the same symbol. The catalog itself is immutable
//! static data, shareable read-only across parser workers.

use bsl_ast::{ItemDecl, Scope, Symbols};

/// Execution locations a built-in symbol is available in.
///
/// One flag per runtime environment plus the integration-services flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Env {
    /// Any client
    pub client: bool,
    /// Server
    pub server: bool,
    /// Thick client
    pub thick_client: bool,
    /// Thin client
    pub thin_client: bool,
    /// Web client
    pub web_client: bool,
    /// Mobile client
    pub mobile_client: bool,
    /// Mobile server
    pub mobile_server: bool,
    /// Standalone mobile application
    pub mobile_app: bool,
    /// External connection
    pub external_connection: bool,
    /// Integration services
    pub integration: bool,
}

impl Env {
    /// Available everywhere.
    pub const UNIVERSAL: Env = Env {
        client: true,
        server: true,
        thick_client: true,
        thin_client: true,
        web_client: true,
        mobile_client: true,
        mobile_server: true,
        mobile_app: true,
        external_connection: true,
        integration: false,
    };
}

/// The kind of module being parsed, which decides the context it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModuleKind {
    /// Common module
    CommonModule,
    /// Managed form module
    ClientApplicationForm,
    /// Document object module
    DocumentObject,
    /// Document manager module
    DocumentManager,
    /// No recognized context; the module scope starts empty
    #[default]
    Unknown,
}

/// Parameter of a built-in method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalMethodParameter {
    /// Parameter name (English)
    pub name: &'static str,
    /// Whether the argument must be supplied
    pub required: bool,
}

/// A built-in attribute with its bilingual names.
#[derive(Debug, Clone, Copy)]
pub struct ContextAttrib {
    /// English and Russian spellings
    pub names: [&'static str; 2],
    /// Availability
    pub env: Env,
}

/// A built-in method with its bilingual names.
#[derive(Debug, Clone, Copy)]
pub struct ContextMethod {
    /// English and Russian spellings
    pub names: [&'static str; 2],
    /// True if the method returns a value
    pub retval: bool,
    /// Parameters in call order
    pub params: &'static [GlobalMethodParameter],
    /// Availability
    pub env: Env,
}

/// The context of one module kind.
#[derive(Debug, Clone, Copy)]
pub struct ModuleContext {
    /// Standard attributes, installed only when not shadowed by a user
    /// declaration
    pub standard: &'static [ContextAttrib],
    /// Attributes, installed unconditionally
    pub attribs: &'static [ContextAttrib],
    /// Methods, installed unconditionally
    pub methods: &'static [ContextMethod],
}

const fn attrib(en: &'static str, ru: &'static str) -> ContextAttrib {
    ContextAttrib { names: [en, ru], env: Env::UNIVERSAL }
}

const fn method(
    en: &'static str,
    ru: &'static str,
    retval: bool,
    params: &'static [GlobalMethodParameter],
) -> ContextMethod {
    ContextMethod { names: [en, ru], retval, params, env: Env::UNIVERSAL }
}

const fn p(name: &'static str, required: bool) -> GlobalMethodParameter {
    GlobalMethodParameter { name, required }
}

static CLIENT_APPLICATION_FORM: ModuleContext = ModuleContext {
    standard: &[],
    attribs: &[
        attrib("UUID", "УникальныйИдентификатор"),
        attrib("ThisObject", "ЭтотОбъект"),
        attrib("ThisForm", "ЭтаФорма"),
        attrib("Items", "Элементы"),
        attrib("Parameters", "Параметры"),
        attrib("ReadOnly", "ТолькоПросмотр"),
        attrib("ConditionalAppearance", "УсловноеОформление"),
        attrib("Modified", "Модифицированность"),
        attrib("Window", "Окно"),
        attrib("Commands", "Команды"),
        attrib("FormOwner", "ВладелецФормы"),
        attrib("CurrentItem", "ТекущийЭлемент"),
        attrib("CommandBar", "КоманднаяПанель"),
    ],
    methods: &[
        method(
            "FormAttributeToValue",
            "РеквизитФормыВЗначение",
            true,
            &[p("AttributeName", true), p("Type", false)],
        ),
        method(
            "ValueToFormAttribute",
            "ЗначениеВРеквизитФормы",
            true,
            &[p("Value", true), p("AttributeName", true)],
        ),
        method("Write", "Записать", true, &[p("WriteParameters", false)]),
        method("LockFormDataForEdit", "ЗаблокироватьДанныеФормыДляРедактирования", false, &[]),
        method("IsInputAvailable", "ВводДоступен", true, &[]),
        method("Close", "Закрыть", true, &[p("CloseParameter", false)]),
        method("Read", "Прочитать", false, &[]),
        method("GetFormFunctionalOption", "ПолучитьФункциональнуюОпциюФормы", false, &[p("Name", true)]),
        method("RefreshDataRepresentation", "ОбновитьОтображениеДанных", false, &[p("UpdateItems", false)]),
        method("GetAttributes", "ПолучитьРеквизиты", true, &[p("Path", false)]),
        method(
            "ChangeAttributes",
            "ИзменитьРеквизиты",
            false,
            &[p("AttributesToBeAdded", false), p("AttributesToBeDeleted", false)],
        ),
        method("NotifyChoice", "ОповеститьОВыборе", false, &[p("SelectionValue", true)]),
        method(
            "ShowChooseFromList",
            "ПоказатьВыборИзСписка",
            false,
            &[
                p("NotifyOnCloseDescription", true),
                p("ValueList", true),
                p("FormItem", false),
                p("InitialValue", false),
            ],
        ),
    ],
};

static COMMON_MODULE: ModuleContext = ModuleContext {
    standard: &[],
    attribs: &[attrib("ThisObject", "ЭтотОбъект")],
    methods: &[],
};

static DOCUMENT_OBJECT: ModuleContext = ModuleContext {
    standard: &[attrib("Ref", "Ссылка")],
    attribs: &[
        attrib("AdditionalProperties", "ДополнительныеСвойства"),
        attrib("RegisterRecords", "Движения"),
        attrib("DataExchange", "ОбменДанными"),
    ],
    methods: &[
        method("PointInTime", "МоментВремени", true, &[]),
        method("Metadata", "Метаданные", true, &[]),
        method("IsNew", "ЭтоНовый", true, &[]),
        method("CheckFilling", "ПроверитьЗаполнение", true, &[]),
        method("Fill", "Заполнить", false, &[p("FillingData", true)]),
    ],
};

static DOCUMENT_MANAGER: ModuleContext = ModuleContext {
    standard: &[],
    attribs: &[],
    methods: &[method("GetTemplate", "ПолучитьМакет", true, &[p("Template", true)])],
};

/// The context for a module kind, if it has one.
pub fn context_for(kind: ModuleKind) -> Option<&'static ModuleContext> {
    match kind {
        ModuleKind::CommonModule => Some(&COMMON_MODULE),
        ModuleKind::ClientApplicationForm => Some(&CLIENT_APPLICATION_FORM),
        ModuleKind::DocumentObject => Some(&DOCUMENT_OBJECT),
        ModuleKind::DocumentManager => Some(&DOCUMENT_MANAGER),
        ModuleKind::Unknown => None,
    }
}

/// Installs the context of `kind` into a module scope.
///
/// Standard attributes are skipped when a user declaration already claimed
/// the name; attributes and methods are installed unconditionally. Both
/// spellings of an entry share one arena item.
pub fn fill(scope: &mut Scope, symbols: &mut Symbols, kind: ModuleKind) {
    let Some(context) = context_for(kind) else { return };

    for prop in context.standard {
        let shadowed =
            prop.names.iter().any(|name| scope.vars.contains_key(name.to_lowercase().as_str()));
        if shadowed {
            continue;
        }
        let item = symbols.alloc_with(prop.names[0], Some(ItemDecl::GlobalObject));
        for name in prop.names {
            scope.vars.insert(name.to_lowercase(), item);
        }
    }

    for prop in context.attribs {
        let item = symbols.alloc_with(prop.names[0], Some(ItemDecl::GlobalObject));
        for name in prop.names {
            scope.vars.insert(name.to_lowercase(), item);
        }
    }

    for m in context.methods {
        let item = symbols.alloc_with(m.names[0], Some(ItemDecl::GlobalMethod { retval: m.retval }));
        for name in m.names {
            scope.methods.insert(name.to_lowercase(), item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn form_module_sees_items_under_both_spellings() {
        let mut scope = Scope::new(None);
        let mut symbols = Symbols::new();
        fill(&mut scope, &mut symbols, ModuleKind::ClientApplicationForm);

        let en = scope.vars.get("items").copied().expect("Items installed");
        let ru = scope.vars.get("элементы").copied().expect("Элементы installed");
        assert_eq!(en, ru);
        assert_eq!(symbols.get(en).name, "Items");
        assert!(matches!(symbols.get(en).decl, Some(ItemDecl::GlobalObject)));
    }

    #[test]
    fn form_module_methods_are_in_their_own_namespace() {
        let mut scope = Scope::new(None);
        let mut symbols = Symbols::new();
        fill(&mut scope, &mut symbols, ModuleKind::ClientApplicationForm);

        assert!(scope.methods.contains_key("close"));
        assert!(scope.methods.contains_key("закрыть"));
        assert!(!scope.vars.contains_key("close"));
    }

    #[test]
    fn standard_attributes_respect_shadowing() {
        let mut scope = Scope::new(None);
        let mut symbols = Symbols::new();
        let user = symbols.alloc("Ссылка");
        scope.vars.insert("ссылка".to_string(), user);

        fill(&mut scope, &mut symbols, ModuleKind::DocumentObject);
        assert_eq!(scope.vars["ссылка"], user); // user declaration wins
        assert!(!scope.vars.contains_key("ref")); // and suppresses both spellings
        assert!(scope.vars.contains_key("обменданными")); // plain attribs still installed
    }

    #[test]
    fn unknown_kind_installs_nothing() {
        let mut scope = Scope::new(None);
        let mut symbols = Symbols::new();
        fill(&mut scope, &mut symbols, ModuleKind::Unknown);
        assert!(scope.vars.is_empty() && scope.methods.is_empty());
    }
}

//! Bilingual keyword, directive and preprocessor tables.
//!
//! Every entry has an English spelling and a Russian spelling mapping to the
//! same enumerant (`Null` is the one exception with a single spelling). The
//! static maps are keyed by the lowercased form; `lookup` lowercases its
//! argument before probing, which is the single case-folding rule used
//! everywhere in the toolchain.

use phf::phf_map;

/// Reserved keywords of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    If,
    Then,
    ElsIf,
    Else,
    EndIf,
    For,
    Each,
    In,
    To,
    While,
    Do,
    EndDo,
    Procedure,
    EndProcedure,
    Function,
    EndFunction,
    Var,
    Val,
    Return,
    Continue,
    Break,
    And,
    Or,
    Not,
    Try,
    Except,
    Raise,
    EndTry,
    New,
    Execute,
    Export,
    Goto,
    True,
    False,
    Undefined,
    Null,
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "if" => Keyword::If,
    "если" => Keyword::If,
    "then" => Keyword::Then,
    "тогда" => Keyword::Then,
    "elsif" => Keyword::ElsIf,
    "иначеесли" => Keyword::ElsIf,
    "else" => Keyword::Else,
    "иначе" => Keyword::Else,
    "endif" => Keyword::EndIf,
    "конецесли" => Keyword::EndIf,
    "for" => Keyword::For,
    "для" => Keyword::For,
    "each" => Keyword::Each,
    "каждого" => Keyword::Each,
    "in" => Keyword::In,
    "из" => Keyword::In,
    "to" => Keyword::To,
    "по" => Keyword::To,
    "while" => Keyword::While,
    "пока" => Keyword::While,
    "do" => Keyword::Do,
    "цикл" => Keyword::Do,
    "enddo" => Keyword::EndDo,
    "конеццикла" => Keyword::EndDo,
    "procedure" => Keyword::Procedure,
    "процедура" => Keyword::Procedure,
    "endprocedure" => Keyword::EndProcedure,
    "конецпроцедуры" => Keyword::EndProcedure,
    "function" => Keyword::Function,
    "функция" => Keyword::Function,
    "endfunction" => Keyword::EndFunction,
    "конецфункции" => Keyword::EndFunction,
    "var" => Keyword::Var,
    "перем" => Keyword::Var,
    "val" => Keyword::Val,
    "знач" => Keyword::Val,
    "return" => Keyword::Return,
    "возврат" => Keyword::Return,
    "continue" => Keyword::Continue,
    "продолжить" => Keyword::Continue,
    "break" => Keyword::Break,
    "прервать" => Keyword::Break,
    "and" => Keyword::And,
    "и" => Keyword::And,
    "or" => Keyword::Or,
    "или" => Keyword::Or,
    "not" => Keyword::Not,
    "не" => Keyword::Not,
    "try" => Keyword::Try,
    "попытка" => Keyword::Try,
    "except" => Keyword::Except,
    "исключение" => Keyword::Except,
    "raise" => Keyword::Raise,
    "вызватьисключение" => Keyword::Raise,
    "endtry" => Keyword::EndTry,
    "конецпопытки" => Keyword::EndTry,
    "new" => Keyword::New,
    "новый" => Keyword::New,
    "execute" => Keyword::Execute,
    "выполнить" => Keyword::Execute,
    "export" => Keyword::Export,
    "экспорт" => Keyword::Export,
    "goto" => Keyword::Goto,
    "перейти" => Keyword::Goto,
    "true" => Keyword::True,
    "истина" => Keyword::True,
    "false" => Keyword::False,
    "ложь" => Keyword::False,
    "undefined" => Keyword::Undefined,
    "неопределено" => Keyword::Undefined,
    "null" => Keyword::Null,
};

impl Keyword {
    /// Case-insensitive bilingual lookup.
    pub fn lookup(ident: &str) -> Option<Keyword> {
        KEYWORDS.get(ident.to_lowercase().as_str()).copied()
    }

    /// Canonical English spelling, used in diagnostics.
    pub fn english(self) -> &'static str {
        match self {
            Keyword::If => "If",
            Keyword::Then => "Then",
            Keyword::ElsIf => "ElsIf",
            Keyword::Else => "Else",
            Keyword::EndIf => "EndIf",
            Keyword::For => "For",
            Keyword::Each => "Each",
            Keyword::In => "In",
            Keyword::To => "To",
            Keyword::While => "While",
            Keyword::Do => "Do",
            Keyword::EndDo => "EndDo",
            Keyword::Procedure => "Procedure",
            Keyword::EndProcedure => "EndProcedure",
            Keyword::Function => "Function",
            Keyword::EndFunction => "EndFunction",
            Keyword::Var => "Var",
            Keyword::Val => "Val",
            Keyword::Return => "Return",
            Keyword::Continue => "Continue",
            Keyword::Break => "Break",
            Keyword::And => "And",
            Keyword::Or => "Or",
            Keyword::Not => "Not",
            Keyword::Try => "Try",
            Keyword::Except => "Except",
            Keyword::Raise => "Raise",
            Keyword::EndTry => "EndTry",
            Keyword::New => "New",
            Keyword::Execute => "Execute",
            Keyword::Export => "Export",
            Keyword::Goto => "Goto",
            Keyword::True => "True",
            Keyword::False => "False",
            Keyword::Undefined => "Undefined",
            Keyword::Null => "Null",
        }
    }
}

/// Compilation directives: `&`-annotations on method and module-variable
/// declarations marking the intended execution location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    AtClient,
    AtServer,
    AtServerNoContext,
    AtClientAtServerNoContext,
    AtClientAtServer,
}

static DIRECTIVES: phf::Map<&'static str, Directive> = phf_map! {
    "atclient" => Directive::AtClient,
    "наклиенте" => Directive::AtClient,
    "atserver" => Directive::AtServer,
    "насервере" => Directive::AtServer,
    "atservernocontext" => Directive::AtServerNoContext,
    "насерверебезконтекста" => Directive::AtServerNoContext,
    "atclientatservernocontext" => Directive::AtClientAtServerNoContext,
    "наклиентенасерверебезконтекста" => Directive::AtClientAtServerNoContext,
    "atclientatserver" => Directive::AtClientAtServer,
    "наклиентенасервере" => Directive::AtClientAtServer,
};

impl Directive {
    /// Case-insensitive bilingual lookup.
    pub fn lookup(ident: &str) -> Option<Directive> {
        DIRECTIVES.get(ident.to_lowercase().as_str()).copied()
    }

    /// Canonical English spelling, used in diagnostics.
    pub fn english(self) -> &'static str {
        match self {
            Directive::AtClient => "AtClient",
            Directive::AtServer => "AtServer",
            Directive::AtServerNoContext => "AtServerNoContext",
            Directive::AtClientAtServerNoContext => "AtClientAtServerNoContext",
            Directive::AtClientAtServer => "AtClientAtServer",
        }
    }
}

/// Preprocessor instructions: `#`-prefixed lines that delimit conditional
/// compilation blocks and named regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrepInstruction {
    If,
    ElsIf,
    Else,
    EndIf,
    Region,
    EndRegion,
}

static PREP_INSTRUCTIONS: phf::Map<&'static str, PrepInstruction> = phf_map! {
    "if" => PrepInstruction::If,
    "если" => PrepInstruction::If,
    "elsif" => PrepInstruction::ElsIf,
    "иначеесли" => PrepInstruction::ElsIf,
    "else" => PrepInstruction::Else,
    "иначе" => PrepInstruction::Else,
    "endif" => PrepInstruction::EndIf,
    "конецесли" => PrepInstruction::EndIf,
    "region" => PrepInstruction::Region,
    "область" => PrepInstruction::Region,
    "endregion" => PrepInstruction::EndRegion,
    "конецобласти" => PrepInstruction::EndRegion,
};

impl PrepInstruction {
    /// Case-insensitive bilingual lookup.
    pub fn lookup(ident: &str) -> Option<PrepInstruction> {
        PREP_INSTRUCTIONS.get(ident.to_lowercase().as_str()).copied()
    }

    /// Canonical English spelling, used in diagnostics.
    pub fn english(self) -> &'static str {
        match self {
            PrepInstruction::If => "If",
            PrepInstruction::ElsIf => "ElsIf",
            PrepInstruction::Else => "Else",
            PrepInstruction::EndIf => "EndIf",
            PrepInstruction::Region => "Region",
            PrepInstruction::EndRegion => "EndRegion",
        }
    }
}

/// Known availability symbols usable inside preprocessor expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrepSymbol {
    Client,
    AtClient,
    AtServer,
    MobileAppClient,
    MobileAppServer,
    ThickClientOrdinaryApplication,
    ThickClientManagedApplication,
    Server,
    ExternalConnection,
    ThinClient,
    WebClient,
}

static PREP_SYMBOLS: phf::Map<&'static str, PrepSymbol> = phf_map! {
    "client" => PrepSymbol::Client,
    "клиент" => PrepSymbol::Client,
    "atclient" => PrepSymbol::AtClient,
    "наклиенте" => PrepSymbol::AtClient,
    "atserver" => PrepSymbol::AtServer,
    "насервере" => PrepSymbol::AtServer,
    "mobileappclient" => PrepSymbol::MobileAppClient,
    "мобильноеприложениеклиент" => PrepSymbol::MobileAppClient,
    "mobileappserver" => PrepSymbol::MobileAppServer,
    "мобильноеприложениесервер" => PrepSymbol::MobileAppServer,
    "thickclientordinaryapplication" => PrepSymbol::ThickClientOrdinaryApplication,
    "толстыйклиентобычноеприложение" => PrepSymbol::ThickClientOrdinaryApplication,
    "thickclientmanagedapplication" => PrepSymbol::ThickClientManagedApplication,
    "толстыйклиентуправляемоеприложение" => PrepSymbol::ThickClientManagedApplication,
    "server" => PrepSymbol::Server,
    "сервер" => PrepSymbol::Server,
    "externalconnection" => PrepSymbol::ExternalConnection,
    "внешнеесоединение" => PrepSymbol::ExternalConnection,
    "thinclient" => PrepSymbol::ThinClient,
    "тонкийклиент" => PrepSymbol::ThinClient,
    "webclient" => PrepSymbol::WebClient,
    "вебклиент" => PrepSymbol::WebClient,
};

impl PrepSymbol {
    /// Case-insensitive bilingual lookup.
    pub fn lookup(ident: &str) -> Option<PrepSymbol> {
        PREP_SYMBOLS.get(ident.to_lowercase().as_str()).copied()
    }
}

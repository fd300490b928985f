//! Rule library: content-quality rules per output element.
//!
//! The base table covers headline, lead, structure, quotation and
//! call-to-action. Industry overlays and audience overlays add rules on top
//! when their key resolves; unknown keys add nothing. The library is built
//! once on first use and never mutated.
//!
//! Besides rendering the rules into the instruction document, the same
//! parameters drive [`audit`], which checks a generated document against
//! the measurable part of the table.

use pressroom_core::document::GeneratedDocumentContent;
use pressroom_core::TargetGroup;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

pub const HEADLINE_CHARS: RangeInclusive<usize> = 40..=75;
pub const LEAD_CHARS: RangeInclusive<usize> = 80..=200;
pub const BODY_PARAGRAPHS: RangeInclusive<usize> = 3..=4;
pub const PARAGRAPH_CHARS: RangeInclusive<usize> = 150..=400;
pub const QUOTE_WORDS: RangeInclusive<usize> = 20..=35;
pub const MAX_QUOTES: usize = 1;
pub const HASHTAG_COUNT: RangeInclusive<usize> = 2..=3;

pub const ACTIVE_VERBS: &[&str] = &["startet", "lanciert", "präsentiert", "launcht", "eröffnet", "erweitert"];
pub const FILLER_WORDS: &[&str] = &[
    "revolutionär",
    "bahnbrechend",
    "einzigartig",
    "weltweit führend",
    "sensationell",
    "absolut",
];
pub const GENERIC_QUOTE_PHRASES: &[&str] = &[
    "wir freuen uns",
    "freuen uns sehr",
    "stolz darauf",
    "ein wichtiger meilenstein",
    "wir sind begeistert",
    "kunden stehen im mittelpunkt",
];
pub const GENERIC_HASHTAGS: &[&str] = &["#news", "#pressemitteilung", "#neu", "#innovation", "#business"];

/// Closing note of every rule rendering.
pub const BRAND_PRECEDENCE_NOTE: &str =
    "HINWEIS: Anweisungen aus dem Brand Layer haben immer Vorrang vor diesen Regeln.";

/// Output elements the base rules are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Headline,
    Lead,
    Structure,
    Quotation,
    CallToAction,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Headline,
        Element::Lead,
        Element::Structure,
        Element::Quotation,
        Element::CallToAction,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Headline => "HEADLINE",
            Self::Lead => "LEAD",
            Self::Structure => "STRUKTUR",
            Self::Quotation => "ZITAT",
            Self::CallToAction => "CALL-TO-ACTION",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Characters,
    Words,
    Paragraphs,
    Hashtags,
    Quotes,
}

impl Unit {
    fn label(self) -> &'static str {
        match self {
            Self::Characters => "Zeichen",
            Self::Words => "Wörter",
            Self::Paragraphs => "Absätze",
            Self::Hashtags => "Hashtags",
            Self::Quotes => "Zitat(e)",
        }
    }
}

/// A single parameterized rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// A length or count that must fall inside a window.
    Window {
        subject: &'static str,
        min: usize,
        max: usize,
        unit: Unit,
    },
    /// An upper bound on a count.
    AtMost {
        subject: &'static str,
        max: usize,
        unit: Unit,
    },
    /// A qualitative requirement.
    Require(&'static str),
    /// Terms that must not appear.
    Ban {
        subject: &'static str,
        terms: &'static [&'static str],
    },
}

impl Rule {
    fn window(subject: &'static str, range: RangeInclusive<usize>, unit: Unit) -> Self {
        Self::Window {
            subject,
            min: *range.start(),
            max: *range.end(),
            unit,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Window { subject, min, max, unit } => {
                format!("✓ {subject}: {min}–{max} {}", unit.label())
            }
            Self::AtMost { subject, max, unit } => {
                format!("✓ {subject}: höchstens {max} {}", unit.label())
            }
            Self::Require(text) => format!("✓ {text}"),
            Self::Ban { subject, terms } => format!("✗ {subject}: {}", terms.join(", ")),
        }
    }
}

/// The base rules of one output element.
#[derive(Debug, Clone, Serialize)]
pub struct ElementRules {
    pub element: Element,
    /// Share of the quality score this element stands for, in percent.
    pub weight: u8,
    pub rules: Vec<Rule>,
}

impl ElementRules {
    fn render(&self) -> String {
        let mut out = format!("{} ({}%):", self.element.title(), self.weight);
        for rule in &self.rules {
            out.push('\n');
            out.push_str(&rule.render());
        }
        out
    }
}

/// Extra rules layered on top of the base table for an industry or audience.
#[derive(Debug, Clone, Serialize)]
pub struct Overlay {
    pub title: &'static str,
    pub checks: &'static [&'static str],
    pub focus: &'static str,
    pub hashtags: &'static [&'static str],
}

impl Overlay {
    fn render(&self) -> String {
        let mut out = self.title.to_string();
        for check in self.checks {
            out.push_str("\n✓ ");
            out.push_str(check);
        }
        if !self.focus.is_empty() {
            out.push_str("\nFokus: ");
            out.push_str(self.focus);
        }
        if !self.hashtags.is_empty() {
            out.push_str("\nHashtag-Ideen: ");
            out.push_str(&self.hashtags.join(" "));
        }
        out
    }
}

/// Writing instructions for one tone, emitted inside the brand layer.
#[derive(Debug, Clone, Serialize)]
pub struct ToneTemplate {
    pub title: &'static str,
    pub guidance: &'static [&'static str],
    pub avoid: &'static [&'static str],
}

impl ToneTemplate {
    pub fn render(&self) -> String {
        let mut lines = vec![self.title.to_string()];
        lines.extend(self.guidance.iter().map(|g| format!("✓ {g}")));
        lines.extend(self.avoid.iter().map(|a| format!("✗ {a}")));
        lines.join("\n")
    }
}

/// The immutable rule table.
#[derive(Debug)]
pub struct RuleLibrary {
    base: Vec<ElementRules>,
    industries: HashMap<&'static str, Overlay>,
    audiences: HashMap<&'static str, Overlay>,
    tones: HashMap<&'static str, ToneTemplate>,
}

static LIBRARY: LazyLock<RuleLibrary> = LazyLock::new(RuleLibrary::build);

/// The process-wide rule library.
pub fn library() -> &'static RuleLibrary {
    &LIBRARY
}

/// Render the applicable rules, with the industry block if `industry`
/// resolves. Always ends with [`BRAND_PRECEDENCE_NOTE`].
pub fn render_rules(industry: Option<&str>) -> String {
    library().render(industry, None)
}

/// Like [`render_rules`], with the audience block of `audience` appended
/// after the industry block.
pub fn render_rules_for(industry: Option<&str>, audience: Option<TargetGroup>) -> String {
    library().render(industry, audience)
}

impl RuleLibrary {
    fn build() -> Self {
        let base = vec![
            ElementRules {
                element: Element::Headline,
                weight: 20,
                rules: vec![
                    Rule::window("Länge", HEADLINE_CHARS, Unit::Characters),
                    Rule::Require("Aktives Verb verwenden (z. B. startet, lanciert, präsentiert, launcht)"),
                    Rule::Require("Wichtigstes Keyword in den ersten drei Wörtern platzieren"),
                    Rule::Ban { subject: "Füllwörter und Übertreibungen", terms: FILLER_WORDS },
                ],
            },
            ElementRules {
                element: Element::Lead,
                weight: 20,
                rules: vec![
                    Rule::window("Länge", LEAD_CHARS, Unit::Characters),
                    Rule::Require("Die fünf W-Fragen beantworten: Wer, Was, Wann, Wo, Warum"),
                    Rule::Require("In **Sterne** einschließen"),
                    Rule::Require("Headline nicht wörtlich wiederholen"),
                ],
            },
            ElementRules {
                element: Element::Structure,
                weight: 20,
                rules: vec![
                    Rule::window("Haupt-Absätze", BODY_PARAGRAPHS, Unit::Paragraphs),
                    Rule::window("Länge je Absatz", PARAGRAPH_CHARS, Unit::Characters),
                    Rule::Require("Ein Gedanke pro Absatz"),
                    Rule::Require("Kurze Sätze, höchstens 15 Wörter"),
                ],
            },
            ElementRules {
                element: Element::Quotation,
                weight: 10,
                rules: vec![
                    Rule::Require(
                        "Format: \"Zitat\", sagt [Name], [Position] bei [Unternehmen].",
                    ),
                    Rule::AtMost { subject: "Anzahl Zitate", max: MAX_QUOTES, unit: Unit::Quotes },
                    Rule::window("Zitatlänge", QUOTE_WORDS, Unit::Words),
                    Rule::Ban { subject: "Generische Unternehmensfloskeln", terms: GENERIC_QUOTE_PHRASES },
                ],
            },
            ElementRules {
                element: Element::CallToAction,
                weight: 10,
                rules: vec![
                    Rule::Require("Konkrete Handlung mit Kontakt oder URL, markiert als [[CTA: ...]]"),
                    Rule::window("Hashtags", HASHTAG_COUNT, Unit::Hashtags),
                    Rule::Require("Hashtags markiert als [[HASHTAGS: ...]]"),
                    Rule::Ban { subject: "Generische Hashtags", terms: GENERIC_HASHTAGS },
                ],
            },
        ];

        let industries = HashMap::from([
            (
                "technology",
                Overlay {
                    title: "BRANCHE: TECHNOLOGIE",
                    checks: &[
                        "Tech-Keywords gezielt einsetzen",
                        "Versionsnummern und Specs nennen",
                        "Zitate von CTO oder Engineering bevorzugen",
                    ],
                    focus: "Innovation, Effizienz, Skalierung, Performance-Metriken, API/Cloud",
                    hashtags: &["#TechNews", "#Software", "#KI", "#Cloud", "#Digitalisierung"],
                },
            ),
            (
                "healthcare",
                Overlay {
                    title: "BRANCHE: GESUNDHEITSWESEN",
                    checks: &[
                        "Patientensicherheit voranstellen",
                        "Studien und Erfolgsraten belegen",
                        "Zitate von Ärztinnen, Ärzten oder Fachleuten bevorzugen",
                    ],
                    focus: "Patientenwohl, Evidenz, Compliance, Zertifizierungen",
                    hashtags: &["#Gesundheit", "#Medizin", "#Therapie", "#Forschung"],
                },
            ),
            (
                "finance",
                Overlay {
                    title: "BRANCHE: FINANZWESEN",
                    checks: &[
                        "Compliance und Sicherheit betonen",
                        "ROI- und Performance-Zahlen nennen",
                        "Zitate von CFO oder Analysten bevorzugen",
                    ],
                    focus: "Sicherheit, Compliance, ROI, Risikomanagement",
                    hashtags: &["#FinTech", "#Banking", "#Investment", "#Compliance"],
                },
            ),
            (
                "manufacturing",
                Overlay {
                    title: "BRANCHE: PRODUKTION/FERTIGUNG",
                    checks: &[
                        "Effizienz und Nachhaltigkeit hervorheben",
                        "Produktionszahlen und KPIs nennen",
                        "Zitate aus dem Operations-Management bevorzugen",
                    ],
                    focus: "Effizienz, Nachhaltigkeit, Automatisierung, CO2-Reduktion",
                    hashtags: &["#Produktion", "#Industrie40", "#Nachhaltigkeit", "#Fertigung"],
                },
            ),
            (
                "retail",
                Overlay {
                    title: "BRANCHE: EINZELHANDEL",
                    checks: &[
                        "Kundenerlebnis in den Mittelpunkt stellen",
                        "Umsatz- oder Conversion-Zahlen nennen",
                    ],
                    focus: "Kundenerlebnis, Omnichannel, Personalisierung",
                    hashtags: &["#Retail", "#Ecommerce", "#Omnichannel"],
                },
            ),
            (
                "automotive",
                Overlay {
                    title: "BRANCHE: AUTOMOTIVE",
                    checks: &[
                        "Nachhaltigkeit und E-Mobilität einordnen",
                        "Verbrauchs- und Performance-Werte nennen",
                        "Zitate aus Entwicklung oder Geschäftsführung bevorzugen",
                    ],
                    focus: "Nachhaltigkeit, Performance, Sicherheit, Connectivity",
                    hashtags: &["#Automotive", "#EMobilität", "#AutoTech"],
                },
            ),
            (
                "education",
                Overlay {
                    title: "BRANCHE: BILDUNG",
                    checks: &[
                        "Lernfortschritt mit Kennzahlen belegen",
                        "Pädagogische Relevanz erklären",
                        "Zitate von Lehrkräften oder Schulleitung bevorzugen",
                    ],
                    focus: "Lernerfolg, Zugänglichkeit, Digitale Transformation, Inklusion",
                    hashtags: &["#Bildung", "#EdTech", "#Lernen"],
                },
            ),
        ]);

        let audiences = HashMap::from([
            (
                "b2b",
                Overlay {
                    title: "ZIELGRUPPE: B2B",
                    checks: &[
                        "Zahlen und ROI prominent platzieren",
                        "Fachbegriffe moderat einsetzen",
                        "Zitate von Entscheidern bevorzugen",
                    ],
                    focus: "ROI, Effizienz, Kostenersparnis, Benchmarks",
                    hashtags: &["#B2B", "#ROI", "#Effizienz"],
                },
            ),
            (
                "consumer",
                Overlay {
                    title: "ZIELGRUPPE: CONSUMER",
                    checks: &[
                        "Einfache Sprache",
                        "Nutzen für den Alltag prominent",
                        "Emotionales, nahbares Zitat",
                    ],
                    focus: "Nutzen, Lifestyle, Verfügbarkeit",
                    hashtags: &["#Lifestyle", "#Alltag", "#Praktisch"],
                },
            ),
            (
                "media",
                Overlay {
                    title: "ZIELGRUPPE: MEDIEN/JOURNALISTEN",
                    checks: &[
                        "Nachrichtenwert betonen",
                        "Zitierfähige Aussagen liefern",
                        "Hintergrundinformationen und Kontaktdaten bereitstellen",
                    ],
                    focus: "",
                    hashtags: &["#Newsroom", "#Medien"],
                },
            ),
        ]);

        let tones = HashMap::from([
            (
                "formal",
                ToneTemplate {
                    title: "TONALITÄT: FORMAL",
                    guidance: &[
                        "Sachliche Geschäftssprache, ausschließlich Sie-Form",
                        "Vollständige, klar gegliederte Sätze",
                        "Zurückhaltende, belegbare Aussagen",
                    ],
                    avoid: &["Umgangssprache und Anglizismen", "Ausrufezeichen", "Du-Form"],
                },
            ),
            (
                "casual",
                ToneTemplate {
                    title: "TONALITÄT: CASUAL",
                    guidance: &[
                        "Locker und nahbar, direkte Ansprache mit du oder ihr",
                        "Alltagssprache statt Fachjargon",
                        "Ein Ausrufezeichen ist erlaubt",
                    ],
                    avoid: &["Steife Amtssprache", "Verschachtelte Sätze"],
                },
            ),
            (
                "modern",
                ToneTemplate {
                    title: "TONALITÄT: MODERN",
                    guidance: &[
                        "Kurze, prägnante Sätze mit 8–12 Wörtern",
                        "Aktive Verben, Zahlen prominent",
                        "Zeitgemäßes Tech-Vokabular, wo es passt",
                    ],
                    avoid: &["Altmodische Floskeln", "Passivkonstruktionen"],
                },
            ),
            (
                "technical",
                ToneTemplate {
                    title: "TONALITÄT: TECHNICAL",
                    guidance: &[
                        "Mindestens drei von: Leistungsdaten, Architektur, Versionen, Messwerte, Standards",
                        "Präzise Fachbegriffe mit Einheiten",
                    ],
                    avoid: &["Marketing-Sprache ohne Beleg", "Vage Superlative"],
                },
            ),
            (
                "startup",
                ToneTemplate {
                    title: "TONALITÄT: STARTUP",
                    guidance: &[
                        "Wachstum belegen: Nutzerzahlen, Traction, Finanzierung",
                        "Handlungsstarke Verben und eine klare Vision",
                        "Hashtags aus dem Startup-Umfeld, z. B. #Startup #Wachstum",
                    ],
                    avoid: &["Vorsichtige, relativierende Formulierungen"],
                },
            ),
        ]);

        Self { base, industries, audiences, tones }
    }

    /// The base rules, in element order.
    pub fn base(&self) -> &[ElementRules] {
        &self.base
    }

    /// Look up an industry overlay; keys are matched case-insensitively.
    pub fn industry(&self, key: &str) -> Option<&Overlay> {
        self.industries.get(key.trim().to_lowercase().as_str())
    }

    pub fn audience(&self, group: TargetGroup) -> Option<&Overlay> {
        self.audiences.get(group.audience_key())
    }

    /// Look up the template of a tone tag, case-insensitively. `undefined`
    /// and unknown tags have none.
    pub fn tone(&self, tag: &str) -> Option<&ToneTemplate> {
        self.tones.get(tag.trim().to_lowercase().as_str())
    }

    /// Known industry keys, sorted.
    pub fn industry_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.industries.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    fn render(&self, industry: Option<&str>, audience: Option<TargetGroup>) -> String {
        let mut blocks: Vec<String> = Vec::with_capacity(self.base.len() + 4);
        blocks.push("QUALITÄTSREGELN (Standard):".to_string());
        blocks.extend(self.base.iter().map(ElementRules::render));

        if let Some(overlay) = industry.and_then(|key| self.industry(key)) {
            blocks.push(overlay.render());
        }
        if let Some(overlay) = audience.and_then(|group| self.audience(group)) {
            blocks.push(overlay.render());
        }

        blocks.push(BRAND_PRECEDENCE_NOTE.to_string());
        blocks.join("\n\n")
    }
}

// ── Audit ─────────────────────────────────────────────────────────────────

/// A measurable rule a generated document breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleViolation {
    pub element: Element,
    pub message: String,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.element, self.message)
    }
}

/// Check generated content against the measurable rules of the table.
pub fn audit(content: &GeneratedDocumentContent) -> Vec<RuleViolation> {
    let mut violations = Vec::new();
    let mut flag = |element: Element, message: String| {
        violations.push(RuleViolation { element, message });
    };

    // Headline
    let headline_len = content.headline.chars().count();
    if !HEADLINE_CHARS.contains(&headline_len) {
        flag(Element::Headline, window_message("Headline", headline_len, &HEADLINE_CHARS, Unit::Characters));
    }
    for term in banned_terms(&content.headline, FILLER_WORDS) {
        flag(Element::Headline, format!("Füllwort in der Headline: {term}"));
    }

    // Lead
    let lead_len = content.lead_paragraph.chars().count();
    if !LEAD_CHARS.contains(&lead_len) {
        flag(Element::Lead, window_message("Lead", lead_len, &LEAD_CHARS, Unit::Characters));
    }
    let headline = content.headline.trim().to_lowercase();
    if !headline.is_empty() && content.lead_paragraph.to_lowercase().contains(&headline) {
        flag(Element::Lead, "Lead wiederholt die Headline wörtlich".to_string());
    }

    // Structure
    let paragraphs = content.body_paragraphs.len();
    if !BODY_PARAGRAPHS.contains(&paragraphs) {
        flag(Element::Structure, window_message("Haupttext", paragraphs, &BODY_PARAGRAPHS, Unit::Paragraphs));
    }
    for (i, paragraph) in content.body_paragraphs.iter().enumerate() {
        let len = paragraph.chars().count();
        if !PARAGRAPH_CHARS.contains(&len) {
            let subject = format!("Absatz {}", i + 1);
            flag(Element::Structure, window_message(&subject, len, &PARAGRAPH_CHARS, Unit::Characters));
        }
    }

    // Quotation
    let quote = &content.quote;
    if quote.text.trim().is_empty() || quote.person.trim().is_empty() {
        flag(Element::Quotation, "Zitat oder Zitatgeber fehlt".to_string());
    } else {
        let words = quote.text.split_whitespace().count();
        if !QUOTE_WORDS.contains(&words) {
            flag(Element::Quotation, window_message("Zitat", words, &QUOTE_WORDS, Unit::Words));
        }
        for term in banned_terms(&quote.text, GENERIC_QUOTE_PHRASES) {
            flag(Element::Quotation, format!("Generische Floskel im Zitat: {term}"));
        }
    }

    // Call-to-action
    if content.cta.trim().is_empty() {
        flag(Element::CallToAction, "Call-to-Action fehlt".to_string());
    } else if !looks_concrete(&content.cta) {
        flag(Element::CallToAction, "Call-to-Action ohne Kontakt oder URL".to_string());
    }
    let tags = content.hashtags.len();
    if !HASHTAG_COUNT.contains(&tags) {
        flag(Element::CallToAction, window_message("Hashtags", tags, &HASHTAG_COUNT, Unit::Hashtags));
    }
    for tag in &content.hashtags {
        if GENERIC_HASHTAGS.contains(&tag.to_lowercase().as_str()) {
            flag(Element::CallToAction, format!("Generischer Hashtag: {tag}"));
        }
    }

    violations
}

fn window_message(subject: &str, actual: usize, window: &RangeInclusive<usize>, unit: Unit) -> String {
    format!(
        "{subject}: {actual} {unit} (Soll {}–{})",
        window.start(),
        window.end(),
        unit = unit.label()
    )
}

fn banned_terms<'a>(text: &str, terms: &'a [&'a str]) -> Vec<&'a str> {
    let lower = text.to_lowercase();
    terms.iter().copied().filter(|t| lower.contains(t)).collect()
}

/// A CTA is concrete when it carries an e-mail, a URL or a phone number.
fn looks_concrete(cta: &str) -> bool {
    let has_mail_or_url = cta.contains('@') || cta.contains("://") || cta.contains("www.");
    let has_domain = cta.split_whitespace().any(|token| {
        let token = token.trim_end_matches(['.', ',', '!', ')']);
        token
            .rsplit_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
    });
    let digits = cta.chars().filter(char::is_ascii_digit).count();
    has_mail_or_url || has_domain || digits >= 6
}

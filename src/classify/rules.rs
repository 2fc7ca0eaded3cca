//! Keyword rule table for telling company affiliations from academic ones.

/// What an affiliation string looks like after applying the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffiliationKind {
    /// University, hospital, institute or similar
    Academic,
    /// Commercial entity
    Company,
    /// No rule matched
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Academic,
    Company,
}

/// One keyword rule. Patterns are lowercase.
#[derive(Debug, Clone, Copy)]
struct Rule {
    pattern: &'static str,
    category: Category,
    /// Only match when not embedded in a longer word
    whole_word: bool,
}

const fn academic(pattern: &'static str) -> Rule {
    Rule {
        pattern,
        category: Category::Academic,
        whole_word: false,
    }
}

const fn company(pattern: &'static str) -> Rule {
    Rule {
        pattern,
        category: Category::Company,
        whole_word: false,
    }
}

const fn company_word(pattern: &'static str) -> Rule {
    Rule {
        pattern,
        category: Category::Company,
        whole_word: true,
    }
}

const RULES: &[Rule] = &[
    academic("universit"),
    academic("universidad"),
    academic("institute"),
    academic("school"),
    academic("college"),
    academic("hospital"),
    academic("department"),
    academic("faculty"),
    academic("center for"),
    academic("centre for"),
    academic("medical center"),
    academic("medical centre"),
    academic("academy"),
    academic("national lab"),
    academic("research council"),
    company_word("inc"),
    company_word("ltd"),
    company_word("corp"),
    company_word("llc"),
    company_word("plc"),
    company_word("ag"),
    company_word("co."),
    company("corporation"),
    company("company"),
    company("limited"),
    company("gmbh"),
    company("pharma"),
    company("biotech"),
    company("therapeutics"),
    company("biosciences"),
    company("diagnostics"),
];

/// Classify an affiliation string.
///
/// Academic terms win over company terms when both appear, so a joint
/// affiliation such as "Pfizer Inc. and Stanford University" is academic.
pub fn classify_affiliation(affiliation: &str) -> AffiliationKind {
    let text = affiliation.trim().to_lowercase();
    if text.is_empty() {
        return AffiliationKind::Unknown;
    }

    let matches = |category: Category| {
        RULES
            .iter()
            .filter(|rule| rule.category == category)
            .any(|rule| rule_matches(rule, &text))
    };

    if matches(Category::Academic) {
        AffiliationKind::Academic
    } else if matches(Category::Company) {
        AffiliationKind::Company
    } else {
        AffiliationKind::Unknown
    }
}

/// Whether an affiliation denotes a company. Absent or empty input is never a company.
pub fn is_company(affiliation: Option<&str>) -> bool {
    affiliation
        .map(|a| classify_affiliation(a) == AffiliationKind::Company)
        .unwrap_or(false)
}

fn rule_matches(rule: &Rule, text: &str) -> bool {
    if rule.whole_word {
        contains_word(text, rule.pattern)
    } else {
        text.contains(rule.pattern)
    }
}

fn contains_word(text: &str, word: &str) -> bool {
    text.match_indices(word).any(|(start, _)| {
        let end = start + word.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        // a leading '.' keeps "u.s.a." style abbreviations in one piece
        before.map_or(true, |c| !c.is_alphanumeric() && c != '.')
            && after.map_or(true, |c| !c.is_alphanumeric())
    })
}

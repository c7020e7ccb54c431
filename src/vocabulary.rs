//! Category vocabulary tables.
//!
//! The form shows human-friendly labels ("Debt Consolidation") while the
//! classifier was trained on the raw dataset tokens ("DEBTCONSOLIDATION").
//! Each categorical field owns one fixed lookup table from display label to
//! training-time token. The encoder names indicator columns
//! `<field>_<token>`, so a table that drifts from the artifact's vocabulary
//! does not error: the affected indicator is simply absent from the schema
//! and the applicant's categorical signal becomes all zeros.
//!
//! # Example
//!
//! ```
//! use lendwise::vocabulary::LOAN_INTENT;
//!
//! assert_eq!(LOAN_INTENT.canonicalize("Debt Consolidation"), Some("DEBTCONSOLIDATION"));
//! assert_eq!(
//!     LOAN_INTENT.column_name("DEBTCONSOLIDATION"),
//!     "loan_intent_DEBTCONSOLIDATION"
//! );
//! ```

/// Display label → training token table for one categorical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTable {
    /// Training column prefix, e.g. `person_gender`
    pub field: &'static str,
    /// `(display label, training token)` pairs in domain order
    pub entries: &'static [(&'static str, &'static str)],
}

impl CategoryTable {
    /// Maps a display label to its training token.
    #[must_use]
    pub fn canonicalize(&self, display: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(label, _)| *label == display)
            .map(|(_, token)| *token)
    }

    /// Maps a training token back to its display label.
    #[must_use]
    pub fn display_for(&self, token: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, t)| *t == token)
            .map(|(label, _)| *label)
    }

    /// Resolves user text against either the display label or the token,
    /// ignoring ASCII case. Returns the display label.
    #[must_use]
    pub fn resolve(&self, text: &str) -> Option<&'static str> {
        let text = text.trim();
        self.entries
            .iter()
            .find(|(label, token)| {
                label.eq_ignore_ascii_case(text) || token.eq_ignore_ascii_case(text)
            })
            .map(|(label, _)| *label)
    }

    /// Indicator column name for a training token.
    #[must_use]
    pub fn column_name(&self, token: &str) -> String {
        format!("{}_{}", self.field, token)
    }

    /// All indicator column names of this field, in domain order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(_, token)| self.column_name(token))
            .collect()
    }

    /// Display labels in domain order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(label, _)| *label)
    }
}

/// `person_gender`
pub const GENDER: CategoryTable = CategoryTable {
    field: "person_gender",
    entries: &[("Female", "female"), ("Male", "male")],
};

/// `person_education`. The dataset already uses the display labels.
pub const EDUCATION: CategoryTable = CategoryTable {
    field: "person_education",
    entries: &[
        ("High School", "High School"),
        ("Bachelor", "Bachelor"),
        ("Master", "Master"),
        ("Associate", "Associate"),
        ("Doctorate", "Doctorate"),
    ],
};

/// `person_home_ownership`
pub const HOME_OWNERSHIP: CategoryTable = CategoryTable {
    field: "person_home_ownership",
    entries: &[
        ("Rent", "RENT"),
        ("Own", "OWN"),
        ("Mortgage", "MORTGAGE"),
        ("Other", "OTHER"),
    ],
};

/// `loan_intent`
pub const LOAN_INTENT: CategoryTable = CategoryTable {
    field: "loan_intent",
    entries: &[
        ("Personal", "PERSONAL"),
        ("Education", "EDUCATION"),
        ("Medical", "MEDICAL"),
        ("Venture", "VENTURE"),
        ("Home Improvement", "HOMEIMPROVEMENT"),
        ("Debt Consolidation", "DEBTCONSOLIDATION"),
    ],
};

/// `previous_loan_defaults_on_file`
pub const PREVIOUS_DEFAULTS: CategoryTable = CategoryTable {
    field: "previous_loan_defaults_on_file",
    entries: &[("No", "No"), ("Yes", "Yes")],
};

/// The full set of tables the encoder consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    /// Gender table
    pub gender: CategoryTable,
    /// Education table
    pub education: CategoryTable,
    /// Home ownership table
    pub home_ownership: CategoryTable,
    /// Loan intent table
    pub loan_intent: CategoryTable,
    /// Previous defaults table
    pub previous_defaults: CategoryTable,
}

impl Vocabulary {
    /// The vocabulary the shipped classifier was trained with.
    pub const TRAINED: Self = Self {
        gender: GENDER,
        education: EDUCATION,
        home_ownership: HOME_OWNERSHIP,
        loan_intent: LOAN_INTENT,
        previous_defaults: PREVIOUS_DEFAULTS,
    };

    /// Tables in encoding order.
    #[must_use]
    pub fn tables(&self) -> [&CategoryTable; 5] {
        [
            &self.gender,
            &self.education,
            &self.home_ownership,
            &self.loan_intent,
            &self.previous_defaults,
        ]
    }

    /// Finds the table that owns an indicator column, returning it with the
    /// column's token.
    #[must_use]
    pub fn split_column<'a>(&self, column: &'a str) -> Option<(&CategoryTable, &'a str)> {
        self.tables().into_iter().find_map(|table| {
            column
                .strip_prefix(table.field)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|token| (table, token))
        })
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::TRAINED
    }
}

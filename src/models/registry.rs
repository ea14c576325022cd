//! Record-type registry: the single static source of truth for each
//! category's submittable fields and report columns. Forms, report tables,
//! and the Excel export all render from the same schema.

use serde::Serialize;

/// A research-record category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Awards,
    Journals,
    Patents,
    Infrastructure,
    Scwfdpg,
    ResearchGrants,
    Phd,
    PhdGuiding,
    Qualifications,
    Visits,
    Membership,
    Consultancy,
    Books,
    JournalEdited,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
}

/// One submittable field of a record type's form.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    /// Inclusive numeric bounds, for `FieldKind::Number` fields.
    pub bounds: Option<(f64, f64)>,
}

/// One display column of a report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub key: String,
    pub label: String,
}

impl ColumnDef {
    fn new(key: &str, label: &str) -> Self {
        ColumnDef {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// The resolved column configuration for a record type.
/// Unknown types resolve to an empty column list, never an error.
#[derive(Debug, Clone, Default)]
pub struct ColumnConfig {
    pub columns: Vec<ColumnDef>,
}

const fn text(key: &'static str, label: &'static str, required: bool) -> FieldDef {
    FieldDef { key, label, required, kind: FieldKind::Text, bounds: None }
}

const fn date(key: &'static str, label: &'static str) -> FieldDef {
    FieldDef { key, label, required: true, kind: FieldKind::Date, bounds: None }
}

const fn number(
    key: &'static str,
    label: &'static str,
    required: bool,
    bounds: Option<(f64, f64)>,
) -> FieldDef {
    FieldDef { key, label, required, kind: FieldKind::Number, bounds }
}

const AWARDS_FIELDS: &[FieldDef] = &[
    text("award", "Award Name", true),
    text("type1", "Award Type", true),
    text("type2", "Level", true),
    text("agency", "Awarding Agency", true),
    text("ifany", "Cash Prize If Any", false),
    date("date2", "Award Date"),
];

const JOURNALS_FIELDS: &[FieldDef] = &[
    text("title", "Paper Title", true),
    text("journal", "Journal Name", true),
    text("issn", "ISSN", false),
    number("authorPosition", "Author Position", true, Some((1.0, 5.0))),
    number("impactFactor", "Impact Factor", false, None),
    date("date", "Publication Date"),
];

const PATENTS_FIELDS: &[FieldDef] = &[
    text("title", "Patent Title", true),
    text("patentNumber", "Patent Number", true),
    text("patentStatus", "Patent Status", true),
    text("country", "Country", true),
    date("date", "Filing Date"),
];

const INFRASTRUCTURE_FIELDS: &[FieldDef] = &[
    text("item", "Equipment / Facility", true),
    number("cost", "Cost", true, None),
    text("fundingSource", "Funding Source", true),
    date("date", "Purchase Date"),
];

const SCWFDPG_FIELDS: &[FieldDef] = &[
    text("category", "Category", true),
    text("title", "Programme Title", true),
    text("organizer", "Organizer", true),
    text("venue", "Venue", true),
    number("days", "Duration (Days)", true, Some((1.0, 60.0))),
    date("date", "Start Date"),
];

const RESEARCH_GRANTS_FIELDS: &[FieldDef] = &[
    text("title", "Project Title", true),
    text("agency", "Funding Agency", true),
    number("amount", "Sanctioned Amount", true, None),
    text("duration", "Duration", true),
    date("date", "Sanction Date"),
];

const PHD_FIELDS: &[FieldDef] = &[
    text("university", "University", true),
    text("thesisTitle", "Thesis Title", true),
    text("guide", "Guide", true),
    date("date", "Award Date"),
];

const PHD_GUIDING_FIELDS: &[FieldDef] = &[
    text("scholarName", "Scholar Name", true),
    text("university", "University", true),
    text("topic", "Research Topic", true),
    text("progress", "Progress", true),
    date("date", "Registration Date"),
];

const QUALIFICATIONS_FIELDS: &[FieldDef] = &[
    text("degree", "Degree", true),
    text("university", "University", true),
    text("specialization", "Specialization", true),
    date("date", "Completion Date"),
];

const VISITS_FIELDS: &[FieldDef] = &[
    text("institution", "Institution Visited", true),
    text("purpose", "Purpose", true),
    text("country", "Country", true),
    date("date", "Visit Date"),
];

const MEMBERSHIP_FIELDS: &[FieldDef] = &[
    text("body", "Professional Body", true),
    text("membershipType", "Membership Type", true),
    text("membershipNo", "Membership Number", true),
    date("date", "Since"),
];

const CONSULTANCY_FIELDS: &[FieldDef] = &[
    text("client", "Client Organization", true),
    text("title", "Work Title", true),
    number("amount", "Revenue", true, None),
    date("date", "Start Date"),
];

const BOOKS_FIELDS: &[FieldDef] = &[
    text("title", "Book Title", true),
    text("publisher", "Publisher", true),
    text("isbn", "ISBN", false),
    text("authors", "Authors", true),
    date("date", "Publication Date"),
];

const JOURNAL_EDITED_FIELDS: &[FieldDef] = &[
    text("journal", "Journal Name", true),
    text("position", "Editorial Position", true),
    text("publisher", "Publisher", true),
    date("date", "Since"),
];

impl RecordType {
    pub const ALL: &'static [RecordType] = &[
        RecordType::Awards,
        RecordType::Journals,
        RecordType::Patents,
        RecordType::Infrastructure,
        RecordType::Scwfdpg,
        RecordType::ResearchGrants,
        RecordType::Phd,
        RecordType::PhdGuiding,
        RecordType::Qualifications,
        RecordType::Visits,
        RecordType::Membership,
        RecordType::Consultancy,
        RecordType::Books,
        RecordType::JournalEdited,
        RecordType::Summary,
    ];

    /// URL path segment for the type's collection endpoints.
    pub fn slug(&self) -> &'static str {
        match self {
            RecordType::Awards => "awards",
            RecordType::Journals => "journals",
            RecordType::Patents => "patents",
            RecordType::Infrastructure => "infrastructure",
            RecordType::Scwfdpg => "scwfdpg",
            RecordType::ResearchGrants => "research-grants",
            RecordType::Phd => "phd",
            RecordType::PhdGuiding => "phd-guiding",
            RecordType::Qualifications => "qualifications",
            RecordType::Visits => "visits",
            RecordType::Membership => "membership",
            RecordType::Consultancy => "consultancy",
            RecordType::Books => "books",
            RecordType::JournalEdited => "journal-edited",
            RecordType::Summary => "summary",
        }
    }

    /// Canonical uppercase name, as used in report queries.
    pub fn name(&self) -> &'static str {
        match self {
            RecordType::Awards => "AWARDS",
            RecordType::Journals => "JOURNALS",
            RecordType::Patents => "PATENTS",
            RecordType::Infrastructure => "INFRASTRUCTURE",
            RecordType::Scwfdpg => "S/C/W/FDP/G",
            RecordType::ResearchGrants => "RESEARCH-GRANTS",
            RecordType::Phd => "PHD",
            RecordType::PhdGuiding => "PHD-GUIDING",
            RecordType::Qualifications => "QUALIFICATIONS",
            RecordType::Visits => "VISITS",
            RecordType::Membership => "MEMBERSHIP",
            RecordType::Consultancy => "CONSULTANCY",
            RecordType::Books => "BOOKS",
            RecordType::JournalEdited => "JOURNAL-EDITED",
            RecordType::Summary => "SUMMARY",
        }
    }

    /// Accepts either the URL slug or the canonical uppercase name.
    pub fn parse(s: &str) -> Option<RecordType> {
        RecordType::ALL
            .iter()
            .copied()
            .find(|t| t.slug() == s || t.name() == s)
    }

    /// Submittable form fields. SUMMARY is a computed view and has none.
    pub fn fields(&self) -> &'static [FieldDef] {
        match self {
            RecordType::Awards => AWARDS_FIELDS,
            RecordType::Journals => JOURNALS_FIELDS,
            RecordType::Patents => PATENTS_FIELDS,
            RecordType::Infrastructure => INFRASTRUCTURE_FIELDS,
            RecordType::Scwfdpg => SCWFDPG_FIELDS,
            RecordType::ResearchGrants => RESEARCH_GRANTS_FIELDS,
            RecordType::Phd => PHD_FIELDS,
            RecordType::PhdGuiding => PHD_GUIDING_FIELDS,
            RecordType::Qualifications => QUALIFICATIONS_FIELDS,
            RecordType::Visits => VISITS_FIELDS,
            RecordType::Membership => MEMBERSHIP_FIELDS,
            RecordType::Consultancy => CONSULTANCY_FIELDS,
            RecordType::Books => BOOKS_FIELDS,
            RecordType::JournalEdited => JOURNAL_EDITED_FIELDS,
            RecordType::Summary => &[],
        }
    }

    /// The first date-valued field, used for academic-year derivation.
    pub fn date_field(&self) -> Option<&'static str> {
        self.fields()
            .iter()
            .find(|f| f.kind == FieldKind::Date)
            .map(|f| f.key)
    }

    /// Full display column list: identity columns, then the type's own
    /// fields, then status.
    pub fn columns(&self) -> Vec<ColumnDef> {
        let mut cols = vec![
            ColumnDef::new("empId", "Employee ID"),
            ColumnDef::new("employee", "Employee"),
            ColumnDef::new("department", "Department"),
        ];
        match self {
            RecordType::Summary => {
                cols.push(ColumnDef::new("total", "Total Submissions"));
                cols.push(ColumnDef::new("accepted", "Accepted"));
                cols.push(ColumnDef::new("pending", "Pending"));
                cols.push(ColumnDef::new("rejected", "Rejected"));
            }
            _ => {
                for f in self.fields() {
                    cols.push(ColumnDef::new(f.key, f.label));
                }
                cols.push(ColumnDef::new("status", "Status"));
            }
        }
        cols
    }
}

/// Column configuration lookup by type name or slug.
/// Unknown names yield an empty configuration; callers fall back to
/// [`infer_columns`].
pub fn lookup(type_name: &str) -> ColumnConfig {
    match RecordType::parse(type_name) {
        Some(t) => ColumnConfig { columns: t.columns() },
        None => ColumnConfig::default(),
    }
}

/// Keys never shown in report tables.
const INTERNAL_KEYS: &[&str] = &["id", "documentPath", "rejectReason", "createdAt"];

/// Fallback schema for ad hoc row shapes: columns from the first row's keys,
/// minus internal fields, labels humanized from the keys.
pub fn infer_columns(first_row: &serde_json::Value) -> Vec<ColumnDef> {
    let Some(obj) = first_row.as_object() else {
        return Vec::new();
    };
    obj.keys()
        .filter(|k| !INTERNAL_KEYS.contains(&k.as_str()))
        .map(|k| ColumnDef {
            key: k.clone(),
            label: humanize_key(k),
        })
        .collect()
}

/// "authorPosition" -> "Author Position", "emp_id" -> "Emp Id".
fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut start_of_word = true;
    for c in key.chars() {
        if c == '_' || c == '-' {
            out.push(' ');
            start_of_word = true;
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
            start_of_word = false;
        } else if start_of_word {
            out.extend(c.to_uppercase());
            start_of_word = false;
        } else {
            out.push(c);
        }
    }
    out
}

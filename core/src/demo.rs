//! Sample data seeded into an empty store so a first run has something to show.

use chrono::{DateTime, Utc};
use quill_types::{BlueprintId, ContractId, Field, FieldId, FieldKind, FieldWidth, Position};

use crate::{Blueprint, Contract, instantiate_contract_at};

pub const DEMO_BLUEPRINT_ID: &str = "demo_employment_agreement_v3";
pub const DEMO_CONTRACT_ID: &str = "demo_contract_instance_v3";
pub const DEMO_CONTRACT_NAME: &str = "Employment Agreement (Standard)";

#[derive(Clone, Copy)]
enum Slot {
    Block(&'static str),
    Text,
    Date,
    Checkbox,
    Signature,
}

struct Row {
    id: &'static str,
    label: &'static str,
    slot: Slot,
    at: (f64, f64),
    width: Option<&'static str>,
}

const fn row(
    id: &'static str,
    label: &'static str,
    slot: Slot,
    at: (f64, f64),
    width: Option<&'static str>,
) -> Row {
    Row {
        id,
        label,
        slot,
        at,
        width,
    }
}

#[rustfmt::skip]
const EMPLOYMENT_AGREEMENT: &[Row] = &[
    row("state_header", "Header", Slot::Block("State of"), (50.0, 50.0), None),
    row("state_input", "State", Slot::Text, (120.0, 40.0), Some("200px")),
    row("doc_title", "Title", Slot::Block("EMPLOYMENT AGREEMENT"), (260.0, 120.0), Some("300px")),
    row("intro_p1", "Intro 1", Slot::Block("This Employment Agreement (the \"Agreement\") is made as of this"), (50.0, 200.0), None),
    row("day_input", "Day", Slot::Text, (520.0, 190.0), Some("50px")),
    row("intro_p2", "Intro 2", Slot::Block("day of"), (580.0, 200.0), None),
    row("month_input", "Month", Slot::Text, (640.0, 190.0), Some("100px")),
    row("intro_p3", "Intro 3", Slot::Block(", 20"), (50.0, 250.0), None),
    row("year_input", "Year", Slot::Text, (90.0, 240.0), Some("60px")),
    row("intro_p4", "Intro 4", Slot::Block("(the \"Effective Date\") by and between"), (160.0, 250.0), None),
    row("employee_name", "Employee Name", Slot::Text, (450.0, 240.0), Some("250px")),
    row("intro_p5", "Intro 5", Slot::Block("(\"Employee\") and"), (50.0, 300.0), None),
    row("employer_name", "Employer Name", Slot::Text, (180.0, 290.0), Some("250px")),
    row("intro_p6", "Intro 6", Slot::Block("(\"Employer\")."), (440.0, 300.0), None),
    row("sec1_title", "Sec 1 Title", Slot::Block("1. Employment."), (50.0, 380.0), None),
    row("sec1_text", "Sec 1 Text", Slot::Block("Employer shall employ Employee as a"), (50.0, 410.0), None),
    row("job_title", "Job Title", Slot::Text, (320.0, 400.0), Some("300px")),
    row("sec1_text2", "Sec 1 Text 2", Slot::Block("[Job title] on a:"), (630.0, 410.0), None),
    row("check_full_time", "Full time", Slot::Checkbox, (50.0, 460.0), None),
    row("check_part_time", "Part time", Slot::Checkbox, (150.0, 460.0), None),
    row("sec1_text3", "Sec 1 Text 3", Slot::Block("basis under this Agreement."), (250.0, 460.0), None),
    row("duties_intro", "Duties", Slot::Block("In this capacity, Employee shall have the following duties:"), (50.0, 510.0), None),
    row("duties_1", "Duty 1", Slot::Text, (50.0, 550.0), Some("650px")),
    row("duties_2", "Duty 2", Slot::Text, (50.0, 600.0), Some("650px")),
    row("duties_3", "Duty 3", Slot::Text, (50.0, 650.0), Some("650px")),
    row("sec2_text", "Sec 2", Slot::Block("2. Performance of Duties. Employee shall perform assigned duties in a professional manner."), (50.0, 720.0), Some("680px")),
    row("sec3_text", "Sec 3", Slot::Block("3. Term. (Check one)"), (50.0, 800.0), None),
    row("term_fixed_check", "Fixed Term", Slot::Checkbox, (50.0, 840.0), None),
    row("term_fixed_start", "Start Date", Slot::Date, (200.0, 830.0), None),
    row("term_fixed_end", "End Date", Slot::Date, (400.0, 830.0), None),
    row("term_at_will_check", "At Will", Slot::Checkbox, (50.0, 890.0), None),
    row("term_at_will_start", "Start Date", Slot::Date, (200.0, 880.0), None),
    row("sec4_text", "Sec 4", Slot::Block("4. Compensation. Employer will pay Employee:"), (50.0, 960.0), None),
    row("salary_amount", "Amount ($)", Slot::Text, (380.0, 950.0), Some("150px")),
    row("pay_per_hour", "per hour", Slot::Checkbox, (550.0, 960.0), None),
    row("pay_per_year", "per year", Slot::Checkbox, (650.0, 960.0), None),
    row("sig_line", "Sig Line", Slot::Block("_______________________"), (50.0, 1040.0), None),
    row("sig_employee", "Employee", Slot::Signature, (50.0, 1020.0), Some("250px")),
    row("sig_emp_label", "Emp Label", Slot::Block("Employee Signature"), (50.0, 1070.0), None),
    row("sig_line2", "Sig Line 2", Slot::Block("_______________________"), (450.0, 1040.0), None),
    row("sig_employer", "Employer", Slot::Signature, (450.0, 1020.0), Some("250px")),
    row("sig_empr_label", "Empr Label", Slot::Block("Employer Signature"), (450.0, 1070.0), None),
];

impl Row {
    fn to_field(&self) -> Field {
        let kind = match self.slot {
            Slot::Block(content) => FieldKind::TextBlock {
                content: content.to_owned(),
            },
            Slot::Text => FieldKind::Text { required: false },
            Slot::Date => FieldKind::Date { required: false },
            Slot::Checkbox => FieldKind::Checkbox { required: false },
            Slot::Signature => FieldKind::Signature { required: false },
        };
        let field = Field::new(
            FieldId::new(self.id),
            self.label,
            kind,
            Position::new(self.at.0, self.at.1),
        );
        match self.width {
            Some(width) => field.with_width(FieldWidth::Css(width.to_owned())),
            None => field,
        }
    }
}

/// One-page employment agreement mixing every input type with static text.
#[must_use]
pub fn demo_blueprint() -> Blueprint {
    Blueprint::new(
        BlueprintId::new(DEMO_BLUEPRINT_ID),
        "Employment Agreement",
        EMPLOYMENT_AGREEMENT.iter().map(Row::to_field).collect(),
    )
}

/// Unfilled contract instantiated from [`demo_blueprint`].
#[must_use]
pub fn demo_contract(created_at: DateTime<Utc>) -> Contract {
    instantiate_contract_at(
        &demo_blueprint(),
        DEMO_CONTRACT_NAME,
        ContractId::new(DEMO_CONTRACT_ID),
        created_at,
    )
}

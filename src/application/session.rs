//! Form session: the patient form's current values and last result.

use chrono::{Days, NaiveDate};
use zeroize::Zeroize;

use crate::domain::{
    AdmissionType, BloodType, Choice, Doctor, FeatureRecord, Gender, InsuranceProvider,
    MedicalCondition, Medication, PredictionResult, DATE_FORMAT,
};

/// Form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Name,
    Age,
    Gender,
    BloodType,
    MedicalCondition,
    Doctor,
    Hospital,
    InsuranceProvider,
    BillingAmount,
    RoomNumber,
    AdmissionType,
    DischargeDate,
    Medication,
}

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// One of a fixed list, cycled with the arrow keys
    Choice,
    /// `yyyy-MM-dd` text that can also be stepped a day at a time
    Date,
}

impl FieldId {
    pub const ALL: [FieldId; 13] = [
        FieldId::Name,
        FieldId::Age,
        FieldId::Gender,
        FieldId::BloodType,
        FieldId::MedicalCondition,
        FieldId::Doctor,
        FieldId::Hospital,
        FieldId::InsuranceProvider,
        FieldId::BillingAmount,
        FieldId::RoomNumber,
        FieldId::AdmissionType,
        FieldId::DischargeDate,
        FieldId::Medication,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Patient Name",
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::BloodType => "Blood Type",
            Self::MedicalCondition => "Medical Condition",
            Self::Doctor => "Doctor",
            Self::Hospital => "Hospital",
            Self::InsuranceProvider => "Insurance Provider",
            Self::BillingAmount => "Billing Amount",
            Self::RoomNumber => "Room Number",
            Self::AdmissionType => "Admission Type",
            Self::DischargeDate => "Discharge Date",
            Self::Medication => "Medication",
        }
    }

    /// Placeholder shown while a text field is empty.
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Name => "Enter Patient Name",
            Self::Age => "Enter Age",
            Self::BillingAmount => "Enter Billing Amount",
            Self::RoomNumber => "Enter Room Number",
            Self::DischargeDate => "yyyy-MM-dd (←/→ to step)",
            _ => "←/→ to select",
        }
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Name | Self::Age | Self::BillingAmount | Self::RoomNumber => FieldKind::Text,
            Self::DischargeDate => FieldKind::Date,
            _ => FieldKind::Choice,
        }
    }
}

/// The result panel contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDisplay {
    /// Name field value when the result was applied
    pub patient_name: String,
    pub result: PredictionResult,
}

impl ResultDisplay {
    /// The three display lines.
    #[must_use]
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Patient: {}", self.patient_name),
            format!("Predicted Category: {}", self.result.category),
            format!("Danger Level: {}", self.result.danger_level),
        ]
    }
}

/// Patient form state.
#[derive(Debug, Clone)]
pub struct FormSession {
    name: String,
    age: String,
    gender: Gender,
    blood_type: BloodType,
    medical_condition: MedicalCondition,
    doctor: Doctor,
    hospitals: Vec<String>,
    hospital: usize,
    insurance_provider: InsuranceProvider,
    billing_amount: String,
    room_number: String,
    admission_type: AdmissionType,
    discharge_date: String,
    medication: Medication,

    selected: usize,
    result: Option<ResultDisplay>,
}

impl FormSession {
    /// Create an empty form offering `hospitals`.
    #[must_use]
    pub fn new(hospitals: Vec<String>) -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            gender: Gender::default(),
            blood_type: BloodType::default(),
            medical_condition: MedicalCondition::default(),
            doctor: Doctor::default(),
            hospitals,
            hospital: 0,
            insurance_provider: InsuranceProvider::default(),
            billing_amount: String::new(),
            room_number: String::new(),
            admission_type: AdmissionType::default(),
            discharge_date: String::new(),
            medication: Medication::default(),
            selected: 0,
            result: None,
        }
    }

    /// Snapshot the current values as a feature record.
    ///
    /// Text is passed through untouched, including empty fields.
    #[must_use]
    pub fn collect(&self) -> FeatureRecord {
        FeatureRecord {
            age: self.age.clone(),
            gender: self.gender,
            blood_type: self.blood_type,
            medical_condition: self.medical_condition,
            doctor: self.doctor,
            hospital: self.hospital_name().to_string(),
            insurance_provider: self.insurance_provider,
            billing_amount: self.billing_amount.clone(),
            room_number: self.room_number.clone(),
            admission_type: self.admission_type,
            discharge_date: self.discharge_date.clone(),
            medication: self.medication,
        }
    }

    /// Show `result` in the result panel, replacing any previous one.
    pub fn apply_result(&mut self, result: PredictionResult) {
        self.result = Some(ResultDisplay {
            patient_name: self.name.clone(),
            result,
        });
    }

    #[must_use]
    pub fn result(&self) -> Option<&ResultDisplay> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn patient_name(&self) -> &str {
        &self.name
    }

    fn hospital_name(&self) -> &str {
        self.hospitals
            .get(self.hospital)
            .map_or("", String::as_str)
    }

    #[must_use]
    pub fn selected_field(&self) -> FieldId {
        FieldId::ALL[self.selected]
    }

    pub fn select(&mut self, field: FieldId) {
        self.selected = FieldId::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap_or(0);
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % FieldId::ALL.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected == 0 {
            self.selected = FieldId::ALL.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// Current value of `field` as displayed.
    #[must_use]
    pub fn display_value(&self, field: FieldId) -> &str {
        match field {
            FieldId::Name => self.name.as_str(),
            FieldId::Age => self.age.as_str(),
            FieldId::Gender => self.gender.label(),
            FieldId::BloodType => self.blood_type.label(),
            FieldId::MedicalCondition => self.medical_condition.label(),
            FieldId::Doctor => self.doctor.label(),
            FieldId::Hospital => self.hospital_name(),
            FieldId::InsuranceProvider => self.insurance_provider.label(),
            FieldId::BillingAmount => self.billing_amount.as_str(),
            FieldId::RoomNumber => self.room_number.as_str(),
            FieldId::AdmissionType => self.admission_type.label(),
            FieldId::DischargeDate => self.discharge_date.as_str(),
            FieldId::Medication => self.medication.label(),
        }
    }

    fn text_mut(&mut self, field: FieldId) -> Option<&mut String> {
        match field {
            FieldId::Name => Some(&mut self.name),
            FieldId::Age => Some(&mut self.age),
            FieldId::BillingAmount => Some(&mut self.billing_amount),
            FieldId::RoomNumber => Some(&mut self.room_number),
            FieldId::DischargeDate => Some(&mut self.discharge_date),
            _ => None,
        }
    }

    /// Replace a text field's value. Returns false for choice fields.
    pub fn set_text(&mut self, field: FieldId, value: &str) -> bool {
        match self.text_mut(field) {
            Some(text) => {
                text.zeroize();
                text.push_str(value);
                true
            }
            None => false,
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let field = self.selected_field();
        if let Some(text) = self.text_mut(field) {
            text.push(c);
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        let field = self.selected_field();
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        let field = self.selected_field();
        if let Some(text) = self.text_mut(field) {
            text.zeroize();
        }
    }

    /// Cycle the current choice field, or step the discharge date by a day.
    pub fn cycle_choice(&mut self, forward: bool) {
        self.cycle_field(forward, chrono::Local::now().date_naive());
    }

    fn cycle_field(&mut self, forward: bool, today: NaiveDate) {
        match self.selected_field() {
            FieldId::Gender => self.gender = self.gender.cycled(forward),
            FieldId::BloodType => self.blood_type = self.blood_type.cycled(forward),
            FieldId::MedicalCondition => {
                self.medical_condition = self.medical_condition.cycled(forward)
            }
            FieldId::Doctor => self.doctor = self.doctor.cycled(forward),
            FieldId::Hospital => {
                let len = self.hospitals.len();
                if len > 0 {
                    self.hospital = if forward {
                        (self.hospital + 1) % len
                    } else {
                        (self.hospital + len - 1) % len
                    };
                }
            }
            FieldId::InsuranceProvider => {
                self.insurance_provider = self.insurance_provider.cycled(forward)
            }
            FieldId::AdmissionType => self.admission_type = self.admission_type.cycled(forward),
            FieldId::Medication => self.medication = self.medication.cycled(forward),
            FieldId::DischargeDate => {
                self.discharge_date = stepped_date(&self.discharge_date, forward, today);
            }
            FieldId::Name | FieldId::Age | FieldId::BillingAmount | FieldId::RoomNumber => {}
        }
    }

    /// Fill the form with a plausible patient.
    pub fn load_sample_data(&mut self) {
        self.set_text(FieldId::Name, "Sample Patient");
        self.set_text(FieldId::Age, "54");
        self.set_text(FieldId::BillingAmount, "18250.75");
        self.set_text(FieldId::RoomNumber, "214");
        self.set_text(FieldId::DischargeDate, "2024-05-17");
        self.gender = Gender::Female;
        self.blood_type = BloodType::APositive;
        self.medical_condition = MedicalCondition::Diabetes;
        self.doctor = Doctor::SamanthaDavies;
        self.hospital = 0;
        self.insurance_provider = InsuranceProvider::Medicare;
        self.admission_type = AdmissionType::Elective;
        self.medication = Medication::Lipitor;
    }

    /// Wipe all field buffers from memory and reset the form.
    pub fn clear(&mut self) {
        for field in FieldId::ALL {
            if let Some(text) = self.text_mut(field) {
                text.zeroize();
            }
        }
        self.gender = Gender::default();
        self.blood_type = BloodType::default();
        self.medical_condition = MedicalCondition::default();
        self.doctor = Doctor::default();
        self.hospital = 0;
        self.insurance_provider = InsuranceProvider::default();
        self.admission_type = AdmissionType::default();
        self.medication = Medication::default();
        self.selected = 0;
        self.result = None;
    }
}

/// Next or previous day after `current`; an empty or unparsable date starts
/// from `today`.
fn stepped_date(current: &str, forward: bool, today: NaiveDate) -> String {
    let date = match NaiveDate::parse_from_str(current.trim(), DATE_FORMAT) {
        Ok(date) => {
            let stepped = if forward {
                date.checked_add_days(Days::new(1))
            } else {
                date.checked_sub_days(Days::new(1))
            };
            stepped.unwrap_or(date)
        }
        Err(_) => today,
    };
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::hospitals::default_hospitals;

    fn filled_session() -> FormSession {
        let mut session = FormSession::new(default_hospitals());
        session.set_text(FieldId::Name, "María José O'Neil");
        session.set_text(FieldId::Age, "61");
        session.set_text(FieldId::BillingAmount, "30500.10");
        session.set_text(FieldId::RoomNumber, "402");
        session.set_text(FieldId::DischargeDate, "2024-02-29");
        session
    }

    #[test]
    fn test_new_session_defaults() {
        let session = FormSession::new(default_hospitals());
        let record = session.collect();

        assert_eq!(record.age, "");
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.hospital, "Sons and Miller");
        assert_eq!(record.medication, Medication::Paracetamol);
        assert!(session.result().is_none());
        assert_eq!(session.selected_field(), FieldId::Name);
    }

    #[test]
    fn test_collect_snapshots_all_fields() {
        let mut session = filled_session();
        session.select(FieldId::Hospital);
        session.cycle_choice(true);
        session.select(FieldId::AdmissionType);
        session.cycle_choice(false);

        let record = session.collect();
        assert_eq!(record.age, "61");
        assert_eq!(record.hospital, "Kim Inc");
        assert_eq!(record.billing_amount, "30500.10");
        assert_eq!(record.room_number, "402");
        assert_eq!(record.admission_type, AdmissionType::Elective);
        assert_eq!(record.discharge_date, "2024-02-29");

        // The snapshot is independent of later edits.
        session.set_text(FieldId::Age, "62");
        assert_eq!(record.age, "61");
    }

    #[test]
    fn test_malformed_text_passes_through() {
        let mut session = FormSession::new(default_hospitals());
        session.set_text(FieldId::Age, "sixty");
        assert_eq!(session.collect().age, "sixty");
    }

    #[test]
    fn test_apply_result_shows_name_verbatim() {
        let mut session = filled_session();
        session.apply_result(PredictionResult::from_category("Moderate"));

        let display = session.result().expect("result applied");
        assert_eq!(display.patient_name, "María José O'Neil");
        assert_eq!(
            display.lines(),
            [
                "Patient: María José O'Neil".to_string(),
                "Predicted Category: Moderate".to_string(),
                "Danger Level: Moderate".to_string(),
            ]
        );
    }

    #[test]
    fn test_apply_result_replaces_previous() {
        let mut session = filled_session();
        session.apply_result(PredictionResult::from_category("Normal"));
        session.apply_result(PredictionResult::from_category("Critical"));

        let display = session.result().expect("result applied");
        assert_eq!(display.result.category, "Critical");
        assert_eq!(display.result.danger_level, crate::domain::DangerLevel::High);
    }

    #[test]
    fn test_text_editing() {
        let mut session = FormSession::new(default_hospitals());
        for c in "Ann\u{7}e".chars() {
            session.input_char(c);
        }
        assert_eq!(session.patient_name(), "Anne");

        session.delete_char();
        assert_eq!(session.patient_name(), "Ann");

        session.clear_field();
        assert_eq!(session.patient_name(), "");
    }

    #[test]
    fn test_choice_fields_ignore_typing() {
        let mut session = FormSession::new(default_hospitals());
        session.select(FieldId::Gender);
        session.input_char('x');
        session.delete_char();
        assert_eq!(session.display_value(FieldId::Gender), "Male");
        assert!(!session.set_text(FieldId::Gender, "Female"));

        session.cycle_choice(true);
        assert_eq!(session.display_value(FieldId::Gender), "Female");
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut session = FormSession::new(default_hospitals());
        session.prev_field();
        assert_eq!(session.selected_field(), FieldId::Medication);
        session.next_field();
        assert_eq!(session.selected_field(), FieldId::Name);
    }

    #[test]
    fn test_hospital_cycle_with_empty_list() {
        let mut session = FormSession::new(Vec::new());
        session.select(FieldId::Hospital);
        session.cycle_choice(true);
        assert_eq!(session.collect().hospital, "");
    }

    #[test]
    fn test_date_stepping() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 4).expect("date");
        assert_eq!(stepped_date("", true, today), "2024-07-04");
        assert_eq!(stepped_date("garbage", false, today), "2024-07-04");
        assert_eq!(stepped_date("2024-02-28", true, today), "2024-02-29");
        assert_eq!(stepped_date("2024-03-01", false, today), "2024-02-29");
        assert_eq!(stepped_date("2023-12-31", true, today), "2024-01-01");

        let mut session = FormSession::new(default_hospitals());
        session.select(FieldId::DischargeDate);
        session.cycle_field(true, today);
        session.cycle_field(true, today);
        assert_eq!(session.collect().discharge_date, "2024-07-05");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = filled_session();
        session.load_sample_data();
        session.apply_result(PredictionResult::from_category("Normal"));
        session.clear();

        assert_eq!(session.collect(), FormSession::new(default_hospitals()).collect());
        assert_eq!(session.patient_name(), "");
        assert!(session.result().is_none());
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(FieldId::Name.kind(), FieldKind::Text);
        assert_eq!(FieldId::DischargeDate.kind(), FieldKind::Date);
        assert_eq!(FieldId::Hospital.kind(), FieldKind::Choice);
        assert_eq!(FieldId::ALL.len(), 13);
    }
}

//! Veteran-support resources and their JSON mapping.
//!
//! Every resource is stored as a JSON object whose `type` field names the
//! variant. Decoding matches that discriminator against a closed set of
//! kinds; anything else is reported as a [`DecodeError`].

use std::{collections::BTreeSet, fmt};

use serde_json::{Map, Value};
use thiserror::Error;

/// Discriminator stored in the `type` field of every persisted resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// Vacancy offered by an employer.
    JobPosting,
    /// Contact details of a psychologist.
    PsychologistContact,
    /// Organisation providing legal help.
    LegalAid,
    /// Course or retraining programme.
    EducationProgram,
    /// Community or peer-support group.
    SocialGroup,
}

impl ResourceKind {
    /// All kinds in menu order.
    pub const ALL: [ResourceKind; 5] = [
        Self::JobPosting,
        Self::PsychologistContact,
        Self::LegalAid,
        Self::EducationProgram,
        Self::SocialGroup,
    ];

    /// Discriminator value written to the `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JobPosting => "JobPosting",
            Self::PsychologistContact => "PsychologistContact",
            Self::LegalAid => "LegalAid",
            Self::EducationProgram => "EducationProgram",
            Self::SocialGroup => "SocialGroup",
        }
    }

    /// Resolve a discriminator value. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "JobPosting" => Some(Self::JobPosting),
            "PsychologistContact" => Some(Self::PsychologistContact),
            "LegalAid" => Some(Self::LegalAid),
            "EducationProgram" => Some(Self::EducationProgram),
            "SocialGroup" => Some(Self::SocialGroup),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a persisted record cannot be turned back into a [`Resource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The array element is not a JSON object.
    #[error("record is not a JSON object")]
    NotAnObject,
    /// The `type` field is absent or null.
    #[error("record has no `type` discriminator")]
    MissingType,
    /// The `type` field does not name a known variant.
    #[error("unknown resource type {0}")]
    UnknownType(String),
    /// A field the variant requires is absent.
    #[error("{kind} record is missing field `{field}`")]
    MissingField {
        /// Variant being decoded.
        kind: ResourceKind,
        /// Name of the absent key.
        field: &'static str,
    },
    /// A required field holds a value of the wrong JSON type.
    #[error("{kind} record has an invalid `{field}` value")]
    InvalidField {
        /// Variant being decoded.
        kind: ResourceKind,
        /// Name of the offending key.
        field: &'static str,
    },
}

/// A vacancy. Requirements form a set; duplicates collapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPosting {
    /// Vacancy name.
    pub title: String,
    /// Hiring company.
    pub company: String,
    /// Free-form description of the role.
    pub description: String,
    /// Distinct requirements, kept sorted so serialization is stable.
    pub requirements: BTreeSet<String>,
    /// How to apply.
    pub contact: String,
}

impl JobPosting {
    /// Split a comma separated list into a requirement set, dropping blanks.
    pub fn parse_requirements(raw: &str) -> BTreeSet<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// A psychologist. The name doubles as the resource title and the
/// specialization as its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsychologistContact {
    /// Full name.
    pub name: String,
    /// Area of practice.
    pub specialization: String,
    /// Phone, e-mail or similar.
    pub contact: String,
    /// Working hours as entered by the operator.
    pub schedule: String,
}

/// Legal aid provider; the organisation name is the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalAid {
    /// Organisation name.
    pub organization: String,
    /// Kind of service (consultation, representation, ...).
    pub service_type: String,
    /// How to reach the organisation.
    pub contact: String,
    /// Description of the service.
    pub description: String,
}

/// Education or retraining programme; the programme name is the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationProgram {
    /// Programme name.
    pub name: String,
    /// Institution running the programme.
    pub institution: String,
    /// Duration as free text, e.g. "6 місяців".
    pub duration: String,
    /// Programme description.
    pub description: String,
    /// Enrolment contact.
    pub contact: String,
}

/// Social or peer group; the group name is the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialGroup {
    /// Group name.
    pub name: String,
    /// What the group focuses on.
    pub focus_area: String,
    /// Venue or "online".
    pub location: String,
    /// Organiser contact.
    pub contact: String,
    /// Group description.
    pub description: String,
}

/// Any resource held by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// See [`JobPosting`].
    JobPosting(JobPosting),
    /// See [`PsychologistContact`].
    PsychologistContact(PsychologistContact),
    /// See [`LegalAid`].
    LegalAid(LegalAid),
    /// See [`EducationProgram`].
    EducationProgram(EducationProgram),
    /// See [`SocialGroup`].
    SocialGroup(SocialGroup),
}

impl Resource {
    /// Discriminator of this resource.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::JobPosting(_) => ResourceKind::JobPosting,
            Self::PsychologistContact(_) => ResourceKind::PsychologistContact,
            Self::LegalAid(_) => ResourceKind::LegalAid,
            Self::EducationProgram(_) => ResourceKind::EducationProgram,
            Self::SocialGroup(_) => ResourceKind::SocialGroup,
        }
    }

    /// Common title field.
    pub fn title(&self) -> &str {
        match self {
            Self::JobPosting(job) => &job.title,
            Self::PsychologistContact(person) => &person.name,
            Self::LegalAid(aid) => &aid.organization,
            Self::EducationProgram(program) => &program.name,
            Self::SocialGroup(group) => &group.name,
        }
    }

    /// Common description field.
    pub fn description(&self) -> &str {
        match self {
            Self::JobPosting(job) => &job.description,
            Self::PsychologistContact(person) => &person.specialization,
            Self::LegalAid(aid) => &aid.description,
            Self::EducationProgram(program) => &program.description,
            Self::SocialGroup(group) => &group.description,
        }
    }

    /// Common contact field.
    pub fn contact(&self) -> &str {
        match self {
            Self::JobPosting(job) => &job.contact,
            Self::PsychologistContact(person) => &person.contact,
            Self::LegalAid(aid) => &aid.contact,
            Self::EducationProgram(program) => &program.contact,
            Self::SocialGroup(group) => &group.contact,
        }
    }

    /// Multi-line, human readable rendering. Keyword search runs against this text.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Ordered JSON object: `type`, the base fields, then variant fields.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".into(), Value::from(self.kind().as_str()));
        map.insert("title".into(), Value::from(self.title()));
        map.insert("description".into(), Value::from(self.description()));
        map.insert("contact".into(), Value::from(self.contact()));

        match self {
            Self::JobPosting(job) => {
                map.insert("company".into(), Value::from(job.company.as_str()));
                map.insert(
                    "requirements".into(),
                    Value::Array(
                        job.requirements
                            .iter()
                            .map(|value| Value::from(value.as_str()))
                            .collect(),
                    ),
                );
            }
            Self::PsychologistContact(person) => {
                map.insert("name".into(), Value::from(person.name.as_str()));
                map.insert(
                    "specialization".into(),
                    Value::from(person.specialization.as_str()),
                );
                map.insert("schedule".into(), Value::from(person.schedule.as_str()));
            }
            Self::LegalAid(aid) => {
                map.insert("service_type".into(), Value::from(aid.service_type.as_str()));
            }
            Self::EducationProgram(program) => {
                map.insert("name".into(), Value::from(program.name.as_str()));
                map.insert(
                    "institution".into(),
                    Value::from(program.institution.as_str()),
                );
                map.insert("duration".into(), Value::from(program.duration.as_str()));
            }
            Self::SocialGroup(group) => {
                map.insert("name".into(), Value::from(group.name.as_str()));
                map.insert("focus_area".into(), Value::from(group.focus_area.as_str()));
                map.insert("location".into(), Value::from(group.location.as_str()));
            }
        }

        map
    }

    /// Rebuild a resource from its persisted JSON form.
    pub fn from_mapping(value: &Value) -> Result<Self, DecodeError> {
        let map = value.as_object().ok_or(DecodeError::NotAnObject)?;
        let kind = match map.get("type") {
            None | Some(Value::Null) => return Err(DecodeError::MissingType),
            Some(Value::String(tag)) => {
                ResourceKind::parse(tag).ok_or_else(|| DecodeError::UnknownType(tag.clone()))?
            }
            Some(other) => return Err(DecodeError::UnknownType(other.to_string())),
        };
        let fields = Fields { kind, map };

        let resource = match kind {
            ResourceKind::JobPosting => Self::JobPosting(JobPosting {
                title: fields.string("title")?,
                company: fields.string("company")?,
                description: fields.string("description")?,
                requirements: fields.string_set("requirements")?,
                contact: fields.string("contact")?,
            }),
            ResourceKind::PsychologistContact => {
                Self::PsychologistContact(PsychologistContact {
                    name: fields.string("name")?,
                    specialization: fields.string("specialization")?,
                    contact: fields.string("contact")?,
                    schedule: fields.string("schedule")?,
                })
            }
            ResourceKind::LegalAid => Self::LegalAid(LegalAid {
                organization: fields.string("title")?,
                service_type: fields.string("service_type")?,
                contact: fields.string("contact")?,
                description: fields.string("description")?,
            }),
            ResourceKind::EducationProgram => Self::EducationProgram(EducationProgram {
                name: fields.string("name")?,
                institution: fields.string("institution")?,
                duration: fields.string("duration")?,
                description: fields.string("description")?,
                contact: fields.string("contact")?,
            }),
            ResourceKind::SocialGroup => Self::SocialGroup(SocialGroup {
                name: fields.string("name")?,
                focus_area: fields.string("focus_area")?,
                location: fields.string("location")?,
                contact: fields.string("contact")?,
                description: fields.string("description")?,
            }),
        };
        Ok(resource)
    }
}

struct Fields<'a> {
    kind: ResourceKind,
    map: &'a Map<String, Value>,
}

impl Fields<'_> {
    fn get(&self, field: &'static str) -> Result<&Value, DecodeError> {
        self.map.get(field).ok_or(DecodeError::MissingField {
            kind: self.kind,
            field,
        })
    }

    fn string(&self, field: &'static str) -> Result<String, DecodeError> {
        self.get(field)?
            .as_str()
            .map(str::to_string)
            .ok_or(DecodeError::InvalidField {
                kind: self.kind,
                field,
            })
    }

    fn string_set(&self, field: &'static str) -> Result<BTreeSet<String>, DecodeError> {
        let invalid = DecodeError::InvalidField {
            kind: self.kind,
            field,
        };
        self.get(field)?
            .as_array()
            .ok_or_else(|| invalid.clone())?
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid.clone()))
            .collect()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Self::PsychologistContact(person) = self {
            return write!(
                f,
                "Ім'я: {}\nСпеціалізація: {}\nКонтакт: {}\nГрафік: {}",
                person.name, person.specialization, person.contact, person.schedule
            );
        }

        write!(
            f,
            "Назва: {}\nОпис: {}\nКонтакт: {}",
            self.title(),
            self.description(),
            self.contact()
        )?;
        match self {
            Self::JobPosting(job) => {
                let requirements: Vec<&str> =
                    job.requirements.iter().map(String::as_str).collect();
                write!(
                    f,
                    "\nКомпанія: {}\nВимоги: {}",
                    job.company,
                    requirements.join(", ")
                )
            }
            Self::LegalAid(aid) => write!(f, "\nТип послуги: {}", aid.service_type),
            Self::EducationProgram(program) => write!(
                f,
                "\nНазва програми: {}\nНавчальний заклад: {}\nТривалість: {}",
                program.name, program.institution, program.duration
            ),
            Self::SocialGroup(group) => write!(
                f,
                "\nНазва групи: {}\nНапрямок: {}\nМісце/Онлайн: {}",
                group.name, group.focus_area, group.location
            ),
            Self::PsychologistContact(_) => Ok(()),
        }
    }
}

impl From<JobPosting> for Resource {
    fn from(value: JobPosting) -> Self {
        Self::JobPosting(value)
    }
}

impl From<PsychologistContact> for Resource {
    fn from(value: PsychologistContact) -> Self {
        Self::PsychologistContact(value)
    }
}

impl From<LegalAid> for Resource {
    fn from(value: LegalAid) -> Self {
        Self::LegalAid(value)
    }
}

impl From<EducationProgram> for Resource {
    fn from(value: EducationProgram) -> Self {
        Self::EducationProgram(value)
    }
}

impl From<SocialGroup> for Resource {
    fn from(value: SocialGroup) -> Self {
        Self::SocialGroup(value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_job(title: &str, company: &str) -> Resource {
        JobPosting {
            title: title.to_string(),
            company: company.to_string(),
            description: "Перевезення вантажів".to_string(),
            requirements: JobPosting::parse_requirements("посвідчення C, досвід"),
            contact: "hr@example.com".to_string(),
        }
        .into()
    }

    fn samples() -> Vec<Resource> {
        vec![
            sample_job("Водій", "Нова Пошта"),
            JobPosting {
                title: "Охоронець".to_string(),
                company: "Acme".to_string(),
                description: String::new(),
                requirements: BTreeSet::new(),
                contact: "+380000000000".to_string(),
            }
            .into(),
            PsychologistContact {
                name: "Олена Коваль".to_string(),
                specialization: "ПТСР".to_string(),
                contact: "olena@example.com".to_string(),
                schedule: "Пн-Пт 9:00-18:00".to_string(),
            }
            .into(),
            LegalAid {
                organization: "Правова допомога".to_string(),
                service_type: "консультація".to_string(),
                contact: "0 800 213 103".to_string(),
                description: "Безоплатна допомога".to_string(),
            }
            .into(),
            EducationProgram {
                name: "Веб-розробка".to_string(),
                institution: "КПІ".to_string(),
                duration: "6 місяців".to_string(),
                description: "Курс для початківців".to_string(),
                contact: "edu@example.com".to_string(),
            }
            .into(),
            SocialGroup {
                name: "Побратими".to_string(),
                focus_area: "підтримка".to_string(),
                location: "онлайн".to_string(),
                contact: "@pobratymy".to_string(),
                description: "Щотижневі зустрічі".to_string(),
            }
            .into(),
        ]
    }

    #[test]
    fn mapping_round_trips_every_variant() {
        for resource in samples() {
            let mapping = Value::Object(resource.to_mapping());
            let decoded = Resource::from_mapping(&mapping).expect("decodes");
            assert_eq!(decoded, resource);
        }
    }

    #[test]
    fn mapping_starts_with_discriminator_then_base_fields() {
        let mapping = samples()[2].to_mapping();
        let keys: Vec<&str> = mapping.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "type",
                "title",
                "description",
                "contact",
                "name",
                "specialization",
                "schedule"
            ]
        );
        assert_eq!(mapping["type"], json!("PsychologistContact"));
        assert_eq!(mapping["title"], json!("Олена Коваль"));
    }

    #[test]
    fn requirements_collapse_and_serialize_as_array() {
        let requirements = JobPosting::parse_requirements(" досвід, освіта,,досвід ,  ");
        assert_eq!(requirements.len(), 2);

        let mapping = sample_job("Водій", "Acme").to_mapping();
        assert!(mapping["requirements"].is_array());
    }

    #[test]
    fn decode_reports_missing_and_unknown_types() {
        assert_eq!(
            Resource::from_mapping(&json!({"title": "x"})),
            Err(DecodeError::MissingType)
        );
        assert_eq!(
            Resource::from_mapping(&json!({"type": "Webinar"})),
            Err(DecodeError::UnknownType("Webinar".to_string()))
        );
        assert_eq!(
            Resource::from_mapping(&json!("JobPosting")),
            Err(DecodeError::NotAnObject)
        );
    }

    #[test]
    fn decode_reports_missing_and_invalid_fields() {
        let missing = json!({
            "type": "LegalAid",
            "title": "Org",
            "description": "d",
            "contact": "c"
        });
        assert_eq!(
            Resource::from_mapping(&missing),
            Err(DecodeError::MissingField {
                kind: ResourceKind::LegalAid,
                field: "service_type"
            })
        );

        let invalid = json!({
            "type": "JobPosting",
            "title": "Driver",
            "company": "Acme",
            "description": "d",
            "requirements": "licence",
            "contact": "c"
        });
        assert_eq!(
            Resource::from_mapping(&invalid),
            Err(DecodeError::InvalidField {
                kind: ResourceKind::JobPosting,
                field: "requirements"
            })
        );
    }

    #[test]
    fn text_lists_base_then_variant_fields() {
        let text = sample_job("Водій", "Нова Пошта").to_text();
        assert_eq!(
            text,
            "Назва: Водій\nОпис: Перевезення вантажів\nКонтакт: hr@example.com\n\
             Компанія: Нова Пошта\nВимоги: досвід, посвідчення C"
        );

        let text = samples()[2].to_text();
        assert!(text.starts_with("Ім'я: Олена Коваль\nСпеціалізація: ПТСР"));
        assert!(text.ends_with("Графік: Пн-Пт 9:00-18:00"));
    }
}

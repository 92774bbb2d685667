use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The fixed set of accident categories the intake form offers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentType {
    #[serde(rename = "наезд на пешехода")]
    PedestrianStrike,
    #[serde(rename = "столкновение")]
    Collision,
    #[serde(rename = "опрокидывание")]
    Rollover,
    #[serde(rename = "наезд на препятствие")]
    ObstacleStrike,
    #[serde(rename = "иное")]
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weather {
    #[serde(rename = "ясно")]
    Clear,
    #[serde(rename = "пасмурно")]
    Overcast,
    #[serde(rename = "дождь")]
    Rain,
    #[serde(rename = "снег")]
    Snow,
    #[serde(rename = "туман")]
    Fog,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadCondition {
    #[serde(rename = "сухое")]
    Dry,
    #[serde(rename = "мокрое")]
    Wet,
    #[serde(rename = "гололед")]
    Ice,
    #[serde(rename = "снежное")]
    Snowy,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lighting {
    #[serde(rename = "светлое время")]
    Daylight,
    #[serde(rename = "темное время")]
    Dark,
    #[serde(rename = "сумерки")]
    Twilight,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictimCondition {
    #[serde(rename = "травмирован")]
    Injured,
    #[serde(rename = "погиб")]
    Deceased,
    #[serde(rename = "легкие повреждения")]
    MinorInjuries,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCondition {
    #[serde(rename = "нормальное")]
    Normal,
    #[serde(rename = "признаки опьянения")]
    SignsOfIntoxication,
    #[serde(rename = "травмирован")]
    Injured,
}

/// A participant section of the case record.
///
/// Invariant: `details` is `None` (serialized as `null`) whenever
/// `present` is `false`. The constructors below enforce this; handlers
/// deserializing operator input should normalize through [`Participant::normalized`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Participant<T> {
    pub present: bool,
    pub details: Option<T>,
}

impl<T> Participant<T> {
    /// A participant that is present at the scene, with its detail record.
    pub fn present(details: T) -> Self {
        Self {
            present: true,
            details: Some(details),
        }
    }

    /// A participant that is absent. `details` is always `None`.
    pub fn absent() -> Self {
        Self {
            present: false,
            details: None,
        }
    }

    /// Drops any details that arrived alongside `present: false`.
    pub fn normalized(mut self) -> Self {
        if !self.present {
            self.details = None;
        }
        self
    }
}

impl<T> Default for Participant<T> {
    fn default() -> Self {
        Self::absent()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VehicleDetails {
    /// Make and model of the vehicle.
    #[serde(rename = "type")]
    pub vehicle_type: String,
    /// Visible damage, free text.
    pub damage: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VictimDetails {
    pub condition: VictimCondition,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DriverDetails {
    pub condition: DriverCondition,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Participants {
    #[serde(default)]
    pub vehicle: Participant<VehicleDetails>,
    #[serde(default)]
    pub victim: Participant<VictimDetails>,
    #[serde(default)]
    pub driver: Participant<DriverDetails>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    pub weather: Weather,
    pub road: RoadCondition,
    pub lighting: Lighting,
}

/// The structured accident record collected from the operator.
///
/// This is the exact shape that gets pretty-printed into the backend prompt,
/// so the serde renames above double as the wire format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub date_time: String,
    pub location: String,
    pub incident_type: IncidentType,
    pub participants: Participants,
    pub conditions: Conditions,
}

impl CaseRecord {
    /// Re-establishes the presence invariant on a record received from the
    /// intake boundary: `details` never survives `present: false`.
    pub fn normalized(mut self) -> Self {
        self.participants.vehicle = self.participants.vehicle.normalized();
        self.participants.victim = self.participants.victim.normalized();
        self.participants.driver = self.participants.driver.normalized();
        self
    }
}

/// Which reply schema the prompt asks the backend for.
///
/// The flat variant expects a single `witness_questions` list; the
/// interrogation variant expects the nested per-role `interrogation_plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanSchema {
    Flat,
    #[default]
    Interrogation,
}

impl FromStr for PlanSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(PlanSchema::Flat),
            "interrogation" => Ok(PlanSchema::Interrogation),
            other => Err(format!("unknown plan schema: '{other}'")),
        }
    }
}

/// The structured plan decoded from the backend reply.
///
/// The prompt instructs the backend to populate every field, but the decoder
/// must not rely on that: everything here is optional or defaulted, and
/// renderers skip absent fields silently.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct InvestigationPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situation_type: Option<String>,
    #[serde(default)]
    pub primary_actions: Vec<String>,
    #[serde(default)]
    pub required_examinations: Vec<String>,
    /// Flat-schema reply shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_questions: Option<Vec<String>>,
    /// Interrogation-schema reply shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrogation_plan: Option<InterrogationPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_recommendations: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct InterrogationPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_questions: Option<WitnessQuestions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_questions: Option<DriverQuestions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victim_questions: Option<VictimQuestions>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct WitnessQuestions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DriverQuestions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_incident: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_incident: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct VictimQuestions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_incident: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<Vec<String>>,
}

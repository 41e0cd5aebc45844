//! The tagged union over the five moderatable content kinds.
//!
//! Every kind carries the same moderation envelope (id, status, optional
//! owning guide) plus its own payload fields matching the backend's wire
//! shapes. The envelope is what the lifecycle reducer and the moderation
//! queue operate on; payloads only matter for field validation at
//! submission time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LifecycleError, Result};
use crate::types::{EntityStatus, UserId, numeric_id};

numeric_id!(
    /// Unique identifier for a place
    PlaceId
);
numeric_id!(
    /// Unique identifier for an activity
    ActivityId
);
numeric_id!(
    /// Unique identifier for a circuit
    CircuitId
);
numeric_id!(
    /// Unique identifier for an event
    EventId
);
numeric_id!(
    /// Unique identifier for an artisan
    ArtisanId
);

/// The five moderatable content kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A point of interest.
    Place,
    /// A bookable activity, attached to a place and a guide.
    Activity,
    /// A bookable multi-stop circuit.
    Circuit,
    /// A dated happening.
    Event,
    /// A craftsperson listing.
    Artisan,
}

impl EntityKind {
    /// All kinds, in the order the admin dashboard lists them.
    pub const ALL: [Self; 5] = [
        Self::Place,
        Self::Activity,
        Self::Circuit,
        Self::Event,
        Self::Artisan,
    ];

    /// The REST base path for this kind.
    #[must_use]
    pub const fn base_path(self) -> &'static str {
        match self {
            Self::Place => "/places",
            Self::Activity => "/activities",
            Self::Circuit => "/circuits",
            Self::Event => "/events",
            Self::Artisan => "/artisans",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Place => "place",
            Self::Activity => "activity",
            Self::Circuit => "circuit",
            Self::Event => "event",
            Self::Artisan => "artisan",
        };
        f.write_str(name)
    }
}

/// Kind-tagged key identifying one entity across the whole catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    /// Which kind the id belongs to.
    pub kind: EntityKind,
    /// The backend-issued id within that kind.
    pub id: i64,
}

impl EntityKey {
    /// Build a key.
    #[must_use]
    pub const fn new(kind: EntityKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

// ============================================================================
// Per-kind records
// ============================================================================

/// A point of interest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Backend-issued id.
    pub id: PlaceId,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// City the place is in.
    pub city: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Hosted image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Moderation status.
    pub status: EntityStatus,
    /// Proposing guide, if guide-submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
}

/// A bookable activity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Backend-issued id.
    pub id: ActivityId,
    /// Display title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Price in local currency.
    pub price: f64,
    /// Human-readable duration ("2h", "half day").
    pub duration: String,
    /// The place the activity happens at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<PlaceId>,
    /// Hosted image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Moderation status.
    pub status: EntityStatus,
    /// Proposing guide, if guide-submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
}

/// A bookable multi-stop circuit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    /// Backend-issued id.
    pub id: CircuitId,
    /// Display title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Human-readable duration ("3 days").
    pub duration: String,
    /// Price in local currency.
    pub price: f64,
    /// Moderation status.
    pub status: EntityStatus,
    /// Proposing guide, if guide-submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
}

/// A dated happening.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Backend-issued id.
    pub id: EventId,
    /// Display title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Where the event takes place.
    pub location: String,
    /// Moderation status.
    pub status: EntityStatus,
    /// Proposing guide, if guide-submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
}

/// A craftsperson listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artisan {
    /// Backend-issued id.
    pub id: ArtisanId,
    /// Craftsperson's name.
    pub name: String,
    /// Craft speciality.
    pub speciality: String,
    /// Contact phone.
    pub phone: String,
    /// City the workshop is in.
    pub city: String,
    /// Moderation status.
    pub status: EntityStatus,
    /// Proposing guide, if guide-submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
}

// ============================================================================
// The union
// ============================================================================

/// Any moderatable content entity.
///
/// The lifecycle reducer is written once against this union; kind-specific
/// behavior is limited to draft validation and REST paths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    /// A place record.
    Place(Place),
    /// An activity record.
    Activity(Activity),
    /// A circuit record.
    Circuit(Circuit),
    /// An event record.
    Event(Event),
    /// An artisan record.
    Artisan(Artisan),
}

impl Entity {
    /// Which kind this entity is.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Place(_) => EntityKind::Place,
            Self::Activity(_) => EntityKind::Activity,
            Self::Circuit(_) => EntityKind::Circuit,
            Self::Event(_) => EntityKind::Event,
            Self::Artisan(_) => EntityKind::Artisan,
        }
    }

    /// Kind-tagged key for catalog lookups.
    #[must_use]
    pub const fn key(&self) -> EntityKey {
        let id = match self {
            Self::Place(p) => p.id.0,
            Self::Activity(a) => a.id.0,
            Self::Circuit(c) => c.id.0,
            Self::Event(e) => e.id.0,
            Self::Artisan(a) => a.id.0,
        };
        EntityKey::new(self.kind(), id)
    }

    /// Moderation status from the common envelope.
    #[must_use]
    pub const fn status(&self) -> EntityStatus {
        match self {
            Self::Place(p) => p.status,
            Self::Activity(a) => a.status,
            Self::Circuit(c) => c.status,
            Self::Event(e) => e.status,
            Self::Artisan(a) => a.status,
        }
    }

    /// Owning guide from the common envelope, if guide-submitted.
    #[must_use]
    pub const fn owner(&self) -> Option<UserId> {
        match self {
            Self::Place(p) => p.owner,
            Self::Activity(a) => a.owner,
            Self::Circuit(c) => c.owner,
            Self::Event(e) => e.owner,
            Self::Artisan(a) => a.owner,
        }
    }

    /// Overwrite the envelope status. Used when applying confirmed events.
    pub fn set_status(&mut self, status: EntityStatus) {
        match self {
            Self::Place(p) => p.status = status,
            Self::Activity(a) => a.status = status,
            Self::Circuit(c) => c.status = status,
            Self::Event(e) => e.status = status,
            Self::Artisan(a) => a.status = status,
        }
    }

    /// Display name for logs and lists.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Place(p) => &p.name,
            Self::Activity(a) => &a.title,
            Self::Circuit(c) => &c.title,
            Self::Event(e) => &e.title,
            Self::Artisan(a) => &a.name,
        }
    }
}

// ============================================================================
// Drafts
// ============================================================================

/// Fields a guide submits for a new place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDraft {
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// City the place is in.
    pub city: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Hosted image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Fields a guide submits for a new activity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDraft {
    /// Display title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Price in local currency.
    pub price: f64,
    /// Human-readable duration.
    pub duration: String,
    /// The place the activity happens at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<PlaceId>,
    /// Hosted image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Fields a guide submits for a new circuit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitDraft {
    /// Display title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Human-readable duration.
    pub duration: String,
    /// Price in local currency.
    pub price: f64,
}

/// Fields a guide submits for a new event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// Display title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Where the event takes place.
    pub location: String,
}

/// Fields a guide submits for a new artisan listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtisanDraft {
    /// Craftsperson's name.
    pub name: String,
    /// Craft speciality.
    pub speciality: String,
    /// Contact phone.
    pub phone: String,
    /// City the workshop is in.
    pub city: String,
}

/// A new-entity submission, before the backend assigns id and status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityDraft {
    /// New place fields.
    Place(PlaceDraft),
    /// New activity fields.
    Activity(ActivityDraft),
    /// New circuit fields.
    Circuit(CircuitDraft),
    /// New event fields.
    Event(EventDraft),
    /// New artisan fields.
    Artisan(ArtisanDraft),
}

impl EntityDraft {
    /// Which kind this draft creates.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Place(_) => EntityKind::Place,
            Self::Activity(_) => EntityKind::Activity,
            Self::Circuit(_) => EntityKind::Circuit,
            Self::Event(_) => EntityKind::Event,
            Self::Artisan(_) => EntityKind::Artisan,
        }
    }

    /// Check that the required fields of the draft are present.
    ///
    /// Guide submissions are validated before any request is built; the
    /// backend validates again, this just gives the earlier, typed error.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Place(d) => {
                require_filled("name", &d.name)?;
                require_filled("description", &d.description)?;
                require_filled("city", &d.city)?;
            },
            Self::Activity(d) => {
                require_filled("title", &d.title)?;
                require_filled("description", &d.description)?;
                require_filled("duration", &d.duration)?;
                if d.price < 0.0 {
                    return Err(LifecycleError::InvalidInput {
                        reason: "price must not be negative".to_owned(),
                    });
                }
            },
            Self::Circuit(d) => {
                require_filled("title", &d.title)?;
                require_filled("description", &d.description)?;
                require_filled("duration", &d.duration)?;
                if d.price < 0.0 {
                    return Err(LifecycleError::InvalidInput {
                        reason: "price must not be negative".to_owned(),
                    });
                }
            },
            Self::Event(d) => {
                require_filled("title", &d.title)?;
                require_filled("description", &d.description)?;
                require_filled("location", &d.location)?;
                if d.end_date < d.start_date {
                    return Err(LifecycleError::InvalidInput {
                        reason: "end date must not precede start date".to_owned(),
                    });
                }
            },
            Self::Artisan(d) => {
                require_filled("name", &d.name)?;
                require_filled("speciality", &d.speciality)?;
                require_filled("city", &d.city)?;
            },
        }
        Ok(())
    }
}

fn require_filled(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(LifecycleError::InvalidInput {
            reason: format!("{field} is required"),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity_draft() -> ActivityDraft {
        ActivityDraft {
            title: "Atelier Poterie".to_owned(),
            description: "Pottery workshop in the medina".to_owned(),
            price: 150.0,
            duration: "2h".to_owned(),
            place_id: Some(PlaceId::new(1)),
            image_url: None,
        }
    }

    #[test]
    fn envelope_accessors_agree_across_kinds() {
        let entity = Entity::Activity(Activity {
            id: ActivityId::new(5),
            title: "Atelier Poterie".to_owned(),
            description: String::new(),
            price: 150.0,
            duration: "2h".to_owned(),
            place_id: None,
            image_url: None,
            status: EntityStatus::Pending,
            owner: Some(UserId::new(7)),
        });

        assert_eq!(entity.kind(), EntityKind::Activity);
        assert_eq!(entity.key(), EntityKey::new(EntityKind::Activity, 5));
        assert_eq!(entity.status(), EntityStatus::Pending);
        assert_eq!(entity.owner(), Some(UserId::new(7)));
        assert_eq!(entity.label(), "Atelier Poterie");
    }

    #[test]
    fn draft_validation_requires_title() {
        let mut draft = activity_draft();
        draft.title = "  ".to_owned();
        let err = EntityDraft::Activity(draft).validate();
        assert!(matches!(err, Err(LifecycleError::InvalidInput { .. })));
    }

    #[test]
    fn draft_validation_rejects_negative_price() {
        let mut draft = activity_draft();
        draft.price = -1.0;
        assert!(EntityDraft::Activity(draft).validate().is_err());
    }

    #[test]
    fn draft_validation_accepts_complete_draft() {
        assert!(EntityDraft::Activity(activity_draft()).validate().is_ok());
    }

    #[test]
    fn base_paths_match_backend_routes() {
        assert_eq!(EntityKind::Place.base_path(), "/places");
        assert_eq!(EntityKind::Artisan.base_path(), "/artisans");
    }
}

// Core data model: plain records with serde derives.
//
// Relationships between entities are informal string-id joins resolved by
// linear search over the fixture store at call time; nothing here enforces
// referential integrity at runtime. Wire-facing structs serialize with
// camelCase field names to match the JSON contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared vocabularies
// ---------------------------------------------------------------------------

/// The five board sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Sports,
    Food,
    Marketplace,
    Research,
    Career,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Sports => "sports",
            Section::Food => "food",
            Section::Marketplace => "marketplace",
            Section::Research => "research",
            Section::Career => "career",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemCondition {
    New,
    LikeNew,
    Good,
    Fair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Available,
    Sold,
    Reserved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Post,
    Comment,
    Like,
    Participation,
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Earn,
    Spend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Open,
    Full,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationStatus {
    Registered,
    Attended,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Fulltime,
    Parttime,
    Internship,
    Contract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareerEventType {
    Seminar,
    Jobfair,
    Workshop,
    Networking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Open,
    Answered,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionDifficulty {
    Undergraduate,
    Graduate,
    Expert,
}

// ---------------------------------------------------------------------------
// People and posts
// ---------------------------------------------------------------------------

/// A registered student. `tokens` is the live point balance; the transaction
/// history behind it lives in the token ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub student_id: String,
    pub major: String,
    pub year: u8,
    pub avatar: String,
    pub tokens: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub section: Section,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes: u32,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes: u32,
}

// ---------------------------------------------------------------------------
// Sports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportsEvent {
    pub id: String,
    pub title: String,
    pub sport: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub max_participants: usize,
    /// Ids of joined users. The original embedded full user records; an id
    /// list keeps the join a linear search like every other relationship.
    pub participant_ids: Vec<String>,
    pub description: String,
    pub skill_level: SkillLevel,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub sport: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_teams: u32,
    pub current_teams: u32,
    pub registration_deadline: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub status: ParticipationStatus,
    pub registered_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Food
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub restaurant: String,
    pub price: u32,
    pub category: String,
    /// Displayed rating, recomputed as the running mean of reviews.
    pub rating: f64,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub author_id: String,
    pub menu_item_id: String,
    pub rating: u8,
    pub comment: String,
    pub photos: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub helpful: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealInvitation {
    pub id: String,
    pub author_id: String,
    pub meal_type: MealType,
    pub datetime: DateTime<Utc>,
    pub restaurant: String,
    pub max_people: usize,
    pub current_people: usize,
    pub message: String,
    pub participant_ids: Vec<String>,
    pub status: InvitationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub category: String,
    pub location: String,
    pub rating: f64,
    pub price_range: String,
    pub image: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Marketplace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketItem {
    pub id: String,
    pub title: String,
    pub seller_id: String,
    pub category: String,
    pub condition: ItemCondition,
    pub price: u32,
    pub description: String,
    pub photos: Vec<String>,
    pub location: String,
    pub delivery_methods: Vec<String>,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub views: u32,
    pub favorites: u32,
}

// ---------------------------------------------------------------------------
// Research
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchPaper {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub field: String,
    pub keywords: Vec<String>,
    pub files: Vec<String>,
    pub access_level: AccessLevel,
    /// Present only for protected papers.
    pub password: Option<String>,
    pub published_at: DateTime<Utc>,
    pub downloads: u32,
    pub citations: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub id: String,
    pub title: String,
    pub field: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub participant_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchQuestion {
    pub id: String,
    pub title: String,
    pub field: String,
    pub difficulty: QuestionDifficulty,
    pub content: String,
    pub bounty: i64,
    pub tags: Vec<String>,
    pub author_id: String,
    pub answers: Vec<Answer>,
    pub status: QuestionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub question_id: String,
    pub author_id: String,
    pub content: String,
    pub is_accepted: bool,
    pub votes: i32,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Career
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub size: String,
    pub description: String,
    pub website: String,
    pub logo: String,
    pub location: String,
    pub rating: f64,
    pub review_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: String,
    pub company_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub location: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: Option<String>,
    pub deadline: DateTime<Utc>,
    pub status: PostingStatus,
    pub applicants: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerEvent {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: CareerEventType,
    pub company_id: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub max_attendees: usize,
    pub current_attendees: usize,
    pub registration_required: bool,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Internship {
    pub id: String,
    pub company_id: String,
    pub title: String,
    pub duration: String,
    pub stipend: Option<u32>,
    pub location: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub application_deadline: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub status: PostingStatus,
}

// ---------------------------------------------------------------------------
// Notifications, activity, tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub action_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub section: Section,
    pub description: String,
    pub target_id: String,
    pub created_at: DateTime<Utc>,
}

/// One entry in a user's token ledger. Newest entries sort first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransaction {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub related_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Messaging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    /// Exactly two participant ids in this app.
    pub participants: Vec<String>,
    pub last_message: Message,
    pub unread_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Section::Marketplace).unwrap(),
            "\"marketplace\""
        );
        let s: Section = serde_json::from_str("\"sports\"").unwrap();
        assert_eq!(s, Section::Sports);
    }

    #[test]
    fn item_condition_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ItemCondition::LikeNew).unwrap(),
            "\"like-new\""
        );
        let c: ItemCondition = serde_json::from_str("\"like-new\"").unwrap();
        assert_eq!(c, ItemCondition::LikeNew);
    }

    #[test]
    fn user_round_trips_with_camel_case_keys() {
        let user = User {
            id: "1".into(),
            name: "Taro Tanaka".into(),
            email: "tanaka@example.com".into(),
            student_id: "N22001234".into(),
            major: "Computer Engineering".into(),
            year: 3,
            avatar: "/avatars/tanaka.jpg".into(),
            tokens: 150,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("studentId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("student_id").is_none());

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn transaction_kind_field_is_named_type() {
        let tx = TokenTransaction {
            id: "t1".into(),
            user_id: "1".into(),
            amount: 5,
            kind: TransactionKind::Earn,
            reason: "posted".into(),
            created_at: Utc::now(),
            related_id: None,
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "earn");
    }

    #[test]
    fn notification_kind_field_is_named_type() {
        let n = Notification {
            id: "n1".into(),
            user_id: "1".into(),
            kind: NotificationKind::Warning,
            title: "Deadline".into(),
            message: "closing soon".into(),
            read: false,
            created_at: Utc::now(),
            action_url: Some("/career".into()),
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["actionUrl"], "/career");
    }

    #[test]
    fn paper_abstract_serializes_as_abstract() {
        let paper = ResearchPaper {
            id: "1".into(),
            title: "Quantum error correction".into(),
            authors: vec!["Hanako Sato".into()],
            abstract_text: "On error correction.".into(),
            field: "physics".into(),
            keywords: vec![],
            files: vec![],
            access_level: AccessLevel::Protected,
            password: Some("quantum2025".into()),
            published_at: Utc::now(),
            downloads: 0,
            citations: 0,
        };
        let json = serde_json::to_value(&paper).unwrap();
        assert!(json.get("abstract").is_some());
        assert_eq!(json["accessLevel"], "protected");
    }
}

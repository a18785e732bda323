// In-memory fixture store standing in for a real datastore.
//
// All entities are seeded once at startup. Creation flows append to these
// vectors; lookups are linear searches by id. Nothing here is durable;
// the only state that survives a restart is the per-user blobs mirrored
// through `db`.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

use crate::model::*;

/// Monotonic id source for records created at runtime. Fixture ids are the
/// small numeric strings ("1", "2", ...); generated ids start well above
/// them so the two ranges never collide.
static NEXT_ID: AtomicU64 = AtomicU64::new(1000);

/// Return a fresh unique id for a locally created record.
pub fn fresh_id() -> String {
    NEXT_ID.fetch_add(1, Ordering::Relaxed).to_string()
}

/// Literal fixture dates are known-valid; the expect can never fire.
fn date(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .expect("valid fixture date")
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// The seeded fixture arrays. One instance per process, owned by the
/// orchestrator; section services borrow it.
#[derive(Debug, Default)]
pub struct Store {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub sports_events: Vec<SportsEvent>,
    pub tournaments: Vec<Tournament>,
    pub participations: Vec<Participation>,
    pub menu_items: Vec<MenuItem>,
    pub reviews: Vec<Review>,
    pub meal_invitations: Vec<MealInvitation>,
    pub restaurants: Vec<Restaurant>,
    pub market_items: Vec<MarketItem>,
    pub research_papers: Vec<ResearchPaper>,
    pub discussions: Vec<Discussion>,
    pub research_questions: Vec<ResearchQuestion>,
    pub companies: Vec<Company>,
    pub job_postings: Vec<JobPosting>,
    pub career_events: Vec<CareerEvent>,
    pub internships: Vec<Internship>,
    pub notifications: Vec<Notification>,
    pub activities: Vec<Activity>,
    pub conversations: Vec<Conversation>,
    pub messages: Vec<Message>,
}

impl Store {
    /// Build the store with the full fixture set seeded.
    pub fn seed() -> Self {
        let users = seed_users();
        Self {
            sports_events: seed_sports_events(&users),
            tournaments: seed_tournaments(),
            participations: seed_participations(),
            menu_items: seed_menu_items(),
            reviews: seed_reviews(),
            meal_invitations: seed_meal_invitations(),
            restaurants: seed_restaurants(),
            market_items: seed_market_items(),
            research_papers: seed_research_papers(),
            discussions: seed_discussions(),
            research_questions: seed_research_questions(),
            companies: seed_companies(),
            job_postings: seed_job_postings(),
            career_events: seed_career_events(),
            internships: seed_internships(),
            notifications: seed_notifications(),
            activities: seed_activities(),
            conversations: seed_conversations(),
            messages: seed_messages(),
            posts: Vec::new(),
            users,
        }
    }

    /// An empty store, useful for tests that seed their own records.
    pub fn empty() -> Self {
        Self::default()
    }

    // -- id lookups (linear, matching the informal joins of the data model) --

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// The seeded default user, used when no session blob exists.
    pub fn default_user(&self) -> Option<&User> {
        self.users.first()
    }

    pub fn sports_event(&self, id: &str) -> Option<&SportsEvent> {
        self.sports_events.iter().find(|e| e.id == id)
    }

    pub fn menu_item(&self, id: &str) -> Option<&MenuItem> {
        self.menu_items.iter().find(|m| m.id == id)
    }

    pub fn market_item(&self, id: &str) -> Option<&MarketItem> {
        self.market_items.iter().find(|i| i.id == id)
    }

    pub fn research_paper(&self, id: &str) -> Option<&ResearchPaper> {
        self.research_papers.iter().find(|p| p.id == id)
    }

    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }
}

// ---------------------------------------------------------------------------
// Per-section views
// ---------------------------------------------------------------------------

/// Borrowed per-section slices, the by-section accessor of the original
/// data layer.
pub struct SportsData<'a> {
    pub events: &'a [SportsEvent],
    pub tournaments: &'a [Tournament],
    pub participations: &'a [Participation],
}

pub struct FoodData<'a> {
    pub menu_items: &'a [MenuItem],
    pub reviews: &'a [Review],
    pub invitations: &'a [MealInvitation],
    pub restaurants: &'a [Restaurant],
}

pub struct MarketplaceData<'a> {
    pub items: &'a [MarketItem],
}

pub struct ResearchData<'a> {
    pub papers: &'a [ResearchPaper],
    pub discussions: &'a [Discussion],
    pub questions: &'a [ResearchQuestion],
}

pub struct CareerData<'a> {
    pub companies: &'a [Company],
    pub jobs: &'a [JobPosting],
    pub events: &'a [CareerEvent],
    pub internships: &'a [Internship],
}

impl Store {
    pub fn sports_data(&self) -> SportsData<'_> {
        SportsData {
            events: &self.sports_events,
            tournaments: &self.tournaments,
            participations: &self.participations,
        }
    }

    pub fn food_data(&self) -> FoodData<'_> {
        FoodData {
            menu_items: &self.menu_items,
            reviews: &self.reviews,
            invitations: &self.meal_invitations,
            restaurants: &self.restaurants,
        }
    }

    pub fn marketplace_data(&self) -> MarketplaceData<'_> {
        MarketplaceData {
            items: &self.market_items,
        }
    }

    pub fn research_data(&self) -> ResearchData<'_> {
        ResearchData {
            papers: &self.research_papers,
            discussions: &self.discussions,
            questions: &self.research_questions,
        }
    }

    pub fn career_data(&self) -> CareerData<'_> {
        CareerData {
            companies: &self.companies,
            jobs: &self.job_postings,
            events: &self.career_events,
            internships: &self.internships,
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn seed_users() -> Vec<User> {
    vec![
        User {
            id: "1".into(),
            name: "Taro Tanaka".into(),
            email: "tanaka@example.com".into(),
            student_id: "N22001234".into(),
            major: "Computer Engineering".into(),
            year: 3,
            avatar: "/avatars/tanaka.jpg".into(),
            tokens: 150,
            created_at: date(2024, 4, 1, 0, 0),
        },
        User {
            id: "2".into(),
            name: "Hanako Sato".into(),
            email: "sato@example.com".into(),
            student_id: "N22001235".into(),
            major: "Electrical Engineering".into(),
            year: 2,
            avatar: "/avatars/sato.jpg".into(),
            tokens: 230,
            created_at: date(2024, 4, 2, 0, 0),
        },
        User {
            id: "3".into(),
            name: "Ichiro Suzuki".into(),
            email: "suzuki@example.com".into(),
            student_id: "N21001100".into(),
            major: "Economics".into(),
            year: 4,
            avatar: "/avatars/suzuki.jpg".into(),
            tokens: 89,
            created_at: date(2023, 4, 1, 0, 0),
        },
        User {
            id: "4".into(),
            name: "Misaki Takahashi".into(),
            email: "takahashi@example.com".into(),
            student_id: "N23001456".into(),
            major: "Literature".into(),
            year: 1,
            avatar: "/avatars/takahashi.jpg".into(),
            tokens: 45,
            created_at: date(2024, 4, 1, 0, 0),
        },
        User {
            id: "5".into(),
            name: "Kenji Yamada".into(),
            email: "yamada@example.com".into(),
            student_id: "N22001789".into(),
            major: "Mechanical Engineering".into(),
            year: 3,
            avatar: "/avatars/yamada.jpg".into(),
            tokens: 312,
            created_at: date(2024, 4, 1, 0, 0),
        },
    ]
}

fn seed_sports_events(users: &[User]) -> Vec<SportsEvent> {
    let ids = |n: usize| -> Vec<String> { users.iter().take(n).map(|u| u.id.clone()).collect() };
    vec![
        SportsEvent {
            id: "1".into(),
            title: "Basketball weekly game".into(),
            sport: "basketball".into(),
            date: date(2025, 6, 15, 15, 0),
            location: "Gym No. 1".into(),
            max_participants: 10,
            participant_ids: ids(4),
            description: "Regular Saturday game. Beginners welcome!".into(),
            skill_level: SkillLevel::Beginner,
            status: EventStatus::Upcoming,
        },
        SportsEvent {
            id: "2".into(),
            title: "Tennis circle practice".into(),
            sport: "tennis".into(),
            date: date(2025, 6, 12, 16, 0),
            location: "Tennis courts".into(),
            max_participants: 8,
            participant_ids: ids(3),
            description: "Practice for all levels, basics through rallies.".into(),
            skill_level: SkillLevel::Intermediate,
            status: EventStatus::Upcoming,
        },
        SportsEvent {
            id: "3".into(),
            title: "Soccer friendly match".into(),
            sport: "soccer".into(),
            date: date(2025, 6, 18, 14, 0),
            location: "Main field".into(),
            max_participants: 22,
            participant_ids: ids(5),
            description: "Friendly against a neighboring university. Spectators welcome.".into(),
            skill_level: SkillLevel::Advanced,
            status: EventStatus::Upcoming,
        },
    ]
}

fn seed_tournaments() -> Vec<Tournament> {
    vec![Tournament {
        id: "1".into(),
        name: "Spring basketball tournament".into(),
        sport: "basketball".into(),
        start_date: date(2025, 7, 1, 0, 0),
        end_date: date(2025, 7, 3, 0, 0),
        max_teams: 16,
        current_teams: 12,
        registration_deadline: date(2025, 6, 25, 0, 0),
        status: "registration".into(),
    }]
}

fn seed_participations() -> Vec<Participation> {
    vec![Participation {
        id: "1".into(),
        user_id: "1".into(),
        event_id: "1".into(),
        status: ParticipationStatus::Registered,
        registered_at: date(2025, 6, 10, 0, 0),
    }]
}

fn seed_menu_items() -> Vec<MenuItem> {
    vec![
        MenuItem {
            id: "1".into(),
            name: "Fried chicken set".into(),
            restaurant: "Cafeteria A".into(),
            price: 450,
            category: "japanese".into(),
            rating: 4.2,
            description: "The filling campus favorite".into(),
            image: "/food/karaage.jpg".into(),
        },
        MenuItem {
            id: "2".into(),
            name: "Curry rice".into(),
            restaurant: "Cafeteria B".into(),
            price: 380,
            category: "japanese".into(),
            rating: 3.8,
            description: "Properly spicy house curry".into(),
            image: "/food/curry.jpg".into(),
        },
        MenuItem {
            id: "3".into(),
            name: "Pasta lunch".into(),
            restaurant: "Cafe terrace".into(),
            price: 520,
            category: "western".into(),
            rating: 4.5,
            description: "Daily rotating pasta set".into(),
            image: "/food/pasta.jpg".into(),
        },
    ]
}

fn seed_reviews() -> Vec<Review> {
    vec![Review {
        id: "1".into(),
        author_id: "1".into(),
        menu_item_id: "1".into(),
        rating: 4,
        comment: "Generous portion and tasty!".into(),
        photos: vec!["/reviews/karaage-review.jpg".into()],
        tags: vec!["filling".into(), "tasty".into()],
        created_at: date(2025, 6, 10, 0, 0),
        helpful: 12,
    }]
}

fn seed_meal_invitations() -> Vec<MealInvitation> {
    vec![MealInvitation {
        id: "1".into(),
        author_id: "2".into(),
        meal_type: MealType::Lunch,
        datetime: date(2025, 6, 12, 12, 0),
        restaurant: "Cafeteria A".into(),
        max_people: 4,
        current_people: 2,
        message: "Anyone up for lunch together?".into(),
        participant_ids: vec!["1".into(), "2".into()],
        status: InvitationStatus::Open,
    }]
}

fn seed_restaurants() -> Vec<Restaurant> {
    vec![Restaurant {
        id: "1".into(),
        name: "Cafeteria A".into(),
        category: "japanese".into(),
        location: "Building 1, ground floor".into(),
        rating: 4.1,
        price_range: "300-600 yen".into(),
        image: "/restaurants/cafeteria-a.jpg".into(),
        description: "Set-meal cafeteria with a wide menu".into(),
    }]
}

fn seed_market_items() -> Vec<MarketItem> {
    vec![
        MarketItem {
            id: "1".into(),
            title: "Intro programming textbook set".into(),
            seller_id: "3".into(),
            category: "textbooks".into(),
            condition: ItemCondition::Good,
            price: 2500,
            description: "C and Java intro texts. Some notes in the margins but perfectly usable."
                .into(),
            photos: vec!["/items/programming-books.jpg".into()],
            location: "On campus".into(),
            delivery_methods: vec!["hand over".into(), "campus mail".into()],
            status: ItemStatus::Available,
            created_at: date(2025, 6, 8, 0, 0),
            views: 45,
            favorites: 12,
        },
        MarketItem {
            id: "2".into(),
            title: "Laptop (ThinkPad)".into(),
            seller_id: "2".into(),
            category: "electronics".into(),
            condition: ItemCondition::LikeNew,
            price: 45000,
            description: "Used for lab work, selling after an upgrade.".into(),
            photos: vec!["/items/thinkpad.jpg".into()],
            location: "Near campus".into(),
            delivery_methods: vec!["hand over".into()],
            status: ItemStatus::Available,
            created_at: date(2025, 6, 9, 0, 0),
            views: 123,
            favorites: 28,
        },
    ]
}

fn seed_research_papers() -> Vec<ResearchPaper> {
    vec![
        ResearchPaper {
            id: "1".into(),
            title: "Improving an image recognition system with machine learning".into(),
            authors: vec!["Taro Tanaka".into(), "Prof. Advisor".into()],
            abstract_text: "A study on accuracy improvements for deep-learning image recognition."
                .into(),
            field: "computer-science".into(),
            keywords: vec![
                "machine learning".into(),
                "image recognition".into(),
                "deep learning".into(),
            ],
            files: vec!["/papers/ml-image-recognition.pdf".into()],
            access_level: AccessLevel::Public,
            password: None,
            published_at: date(2025, 6, 1, 0, 0),
            downloads: 234,
            citations: 12,
        },
        ResearchPaper {
            id: "2".into(),
            title: "Error correction methods for quantum computation".into(),
            authors: vec!["Hanako Sato".into()],
            abstract_text: "On error correction toward practical quantum computers.".into(),
            field: "physics".into(),
            keywords: vec![
                "quantum computing".into(),
                "error correction".into(),
                "quantum information".into(),
            ],
            files: vec!["/papers/quantum-error-correction.pdf".into()],
            access_level: AccessLevel::Protected,
            password: Some("quantum2025".into()),
            published_at: date(2025, 5, 28, 0, 0),
            downloads: 89,
            citations: 5,
        },
    ]
}

fn seed_discussions() -> Vec<Discussion> {
    vec![Discussion {
        id: "1".into(),
        title: "Where is quantum computing headed?".into(),
        field: "physics".into(),
        author_id: "2".into(),
        content: "Let's discuss the practical outlook for quantum computers.".into(),
        created_at: date(2025, 6, 8, 0, 0),
        last_active_at: date(2025, 6, 10, 0, 0),
        participant_ids: vec!["2".into(), "1".into(), "3".into()],
    }]
}

fn seed_research_questions() -> Vec<ResearchQuestion> {
    vec![ResearchQuestion {
        id: "1".into(),
        title: "Optimizing parallel processing in Python".into(),
        field: "computer-science".into(),
        difficulty: QuestionDifficulty::Undergraduate,
        content: "When should I pick multiprocessing over multithreading?".into(),
        bounty: 50,
        tags: vec!["Python".into(), "parallelism".into(), "optimization".into()],
        author_id: "1".into(),
        answers: Vec::new(),
        status: QuestionStatus::Open,
        created_at: date(2025, 6, 9, 0, 0),
    }]
}

fn seed_companies() -> Vec<Company> {
    vec![
        Company {
            id: "1".into(),
            name: "Tech Solution Inc.".into(),
            industry: "tech".into(),
            size: "Mid-size (100-500)".into(),
            description: "IT company focused on AI and cloud services".into(),
            website: "https://techsolution.example.com".into(),
            logo: "/companies/techsolution.png".into(),
            location: "Shibuya, Tokyo".into(),
            rating: 4.2,
            review_count: 156,
        },
        Company {
            id: "2".into(),
            name: "Mirai Financial Group".into(),
            industry: "finance".into(),
            size: "Large (1000+)".into(),
            description: "Financial firm building fintech solutions".into(),
            website: "https://mirai-finance.example.com".into(),
            logo: "/companies/mirai-finance.png".into(),
            location: "Chiyoda, Tokyo".into(),
            rating: 3.9,
            review_count: 89,
        },
    ]
}

fn seed_job_postings() -> Vec<JobPosting> {
    vec![JobPosting {
        id: "1".into(),
        company_id: "1".into(),
        title: "Software engineer (new grad)".into(),
        job_type: JobType::Fulltime,
        location: "Shibuya, Tokyo".into(),
        description: "Web application and AI system development".into(),
        requirements: vec!["Programming experience".into(), "Team development".into()],
        salary: Some("from 250k yen/month".into()),
        deadline: date(2025, 7, 31, 0, 0),
        status: PostingStatus::Open,
        applicants: 45,
    }]
}

fn seed_career_events() -> Vec<CareerEvent> {
    vec![CareerEvent {
        id: "1".into(),
        title: "Tech Solution company briefing".into(),
        event_type: CareerEventType::Seminar,
        company_id: Some("1".into()),
        date: date(2025, 6, 16, 13, 0),
        location: "Lecture hall A".into(),
        description: "Detailed introduction to the AI and cloud businesses".into(),
        max_attendees: 100,
        current_attendees: 67,
        registration_required: true,
        status: EventStatus::Upcoming,
    }]
}

fn seed_internships() -> Vec<Internship> {
    vec![Internship {
        id: "1".into(),
        company_id: "1".into(),
        title: "Summer internship (engineering)".into(),
        duration: "2 weeks".into(),
        stipend: Some(100_000),
        location: "Shibuya, Tokyo".into(),
        description: "Join a live development project".into(),
        requirements: vec!["Programming basics".into(), "Git experience".into()],
        application_deadline: date(2025, 6, 30, 0, 0),
        start_date: date(2025, 8, 1, 0, 0),
        status: PostingStatus::Open,
    }]
}

fn seed_notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: "1".into(),
            user_id: "1".into(),
            kind: NotificationKind::Info,
            title: "New event".into(),
            message: "The basketball weekly game is looking for players".into(),
            read: false,
            created_at: date(2025, 6, 10, 10, 0),
            action_url: Some("/sports/1".into()),
        },
        Notification {
            id: "2".into(),
            user_id: "1".into(),
            kind: NotificationKind::Success,
            title: "Tokens earned".into(),
            message: "You earned 5 tokens from likes on your post".into(),
            read: false,
            created_at: date(2025, 6, 10, 9, 30),
            action_url: None,
        },
        Notification {
            id: "3".into(),
            user_id: "1".into(),
            kind: NotificationKind::Warning,
            title: "Application deadline".into(),
            message: "The company briefing application window closes soon".into(),
            read: true,
            created_at: date(2025, 6, 9, 15, 0),
            action_url: Some("/career/events".into()),
        },
    ]
}

fn seed_activities() -> Vec<Activity> {
    vec![
        Activity {
            id: "1".into(),
            user_id: "2".into(),
            kind: ActivityKind::Post,
            section: Section::Sports,
            description: "Posted a new tennis practice session".into(),
            target_id: "2".into(),
            created_at: date(2025, 6, 10, 14, 30),
        },
        Activity {
            id: "2".into(),
            user_id: "3".into(),
            kind: ActivityKind::Review,
            section: Section::Food,
            description: "Reviewed the fried chicken set at Cafeteria A".into(),
            target_id: "1".into(),
            created_at: date(2025, 6, 10, 12, 15),
        },
        Activity {
            id: "3".into(),
            user_id: "1".into(),
            kind: ActivityKind::Participation,
            section: Section::Sports,
            description: "Signed up for the basketball weekly game".into(),
            target_id: "1".into(),
            created_at: date(2025, 6, 10, 11, 0),
        },
    ]
}

fn seed_conversations() -> Vec<Conversation> {
    vec![Conversation {
        id: "1".into(),
        participants: vec!["1".into(), "2".into()],
        last_message: Message {
            id: "m3".into(),
            conversation_id: "1".into(),
            sender_id: "2".into(),
            content: "See you at the lab tomorrow!".into(),
            created_at: date(2025, 6, 10, 18, 5),
            read: false,
        },
        unread_count: 1,
    }]
}

fn seed_messages() -> Vec<Message> {
    vec![
        Message {
            id: "m1".into(),
            conversation_id: "1".into(),
            sender_id: "1".into(),
            content: "Did you finish the circuits assignment?".into(),
            created_at: date(2025, 6, 10, 17, 50),
            read: true,
        },
        Message {
            id: "m2".into(),
            conversation_id: "1".into(),
            sender_id: "2".into(),
            content: "Almost! Stuck on the last problem.".into(),
            created_at: date(2025, 6, 10, 17, 58),
            read: true,
        },
        Message {
            id: "m3".into(),
            conversation_id: "1".into(),
            sender_id: "2".into(),
            content: "See you at the lab tomorrow!".into(),
            created_at: date(2025, 6, 10, 18, 5),
            read: false,
        },
    ]
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

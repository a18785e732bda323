// Application orchestrator.
//
// `Board` owns the fixture store, the session, the token ledger, and the
// notification center, and composes the section services into the flows the
// UI triggers: joining an event awards participation tokens and pushes the
// confirmation notification, posting a review awards review tokens, and so
// on. The chat relay is deliberately not here; it is stateless and lives
// behind the HTTP layer on its own.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;

use crate::config::Config;
use crate::db::Database;
use crate::model::{Activity, ActivityKind, Comment, Post, Section};
use crate::notify::{drafts, NotificationCenter};
use crate::sections::{career, food, marketplace, research, sports};
use crate::session::Session;
use crate::store::{fresh_id, Store};
use crate::tokens::TokenLedger;

pub struct Board {
    pub config: Config,
    pub db: Database,
    pub store: Store,
    pub session: Session,
    pub ledger: TokenLedger,
    pub notifications: NotificationCenter,
}

impl Board {
    /// Restore per-user state for the session user and grant the daily
    /// login bonus when due.
    pub fn init(config: Config, db: Database, store: Store) -> Result<Self> {
        let mut session = Session::restore(&db, &store).context("failed to restore session")?;
        let user_id = session
            .current()
            .map(|u| u.id.clone())
            .ok_or_else(|| anyhow!("session restore produced no user"))?;

        let mut ledger =
            TokenLedger::restore(&db, &user_id).context("failed to restore token ledger")?;
        let notifications = NotificationCenter::restore(&db, &store, &user_id)
            .context("failed to restore notifications")?;

        if let Some(user) = session.current_mut() {
            let granted = ledger.grant_daily_bonus(
                &db,
                user,
                config.rewards.daily_login,
                Utc::now().date_naive(),
            )?;
            if granted {
                tracing::info!(user = %user.id, "daily login bonus granted");
            }
        }
        session.persist(&db)?;

        Ok(Self {
            config,
            db,
            store,
            session,
            ledger,
            notifications,
        })
    }

    fn current_user_id(&self) -> Result<String> {
        self.session
            .current()
            .map(|u| u.id.clone())
            .ok_or_else(|| anyhow!("not signed in"))
    }

    /// Earn tokens for the session user and re-persist their balance.
    fn award(&mut self, amount: u32, reason: &str, related_id: Option<String>) -> Result<()> {
        let Some(user) = self.session.current_mut() else {
            return Ok(());
        };
        self.ledger.earn(&self.db, user, amount, reason, related_id)?;
        self.session.persist(&self.db)
    }

    /// Append an entry to the activity feed for the session user.
    fn log_activity(
        &mut self,
        kind: ActivityKind,
        section: Section,
        description: String,
        target_id: &str,
    ) -> Result<()> {
        let user_id = self.current_user_id()?;
        self.store.activities.push(Activity {
            id: fresh_id(),
            user_id,
            kind,
            section,
            description,
            target_id: target_id.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    // -- posts --

    /// Create a board post and award creation tokens.
    pub fn create_post(
        &mut self,
        section: Section,
        title: &str,
        content: &str,
        tags: Vec<String>,
    ) -> Result<String> {
        let user_id = self.current_user_id()?;
        let now = Utc::now();
        let id = fresh_id();
        self.store.posts.push(Post {
            id: id.clone(),
            author_id: user_id,
            section,
            title: title.to_string(),
            content: content.to_string(),
            images: Vec::new(),
            tags,
            created_at: now,
            updated_at: now,
            likes: 0,
            comments: Vec::new(),
        });

        let amount = self.config.rewards.post_creation;
        self.award(amount, "Created a post", Some(id.clone()))?;
        self.log_activity(
            ActivityKind::Post,
            section,
            format!("Posted \"{title}\""),
            &id,
        )?;
        Ok(id)
    }

    /// Comment on a post and award comment tokens.
    pub fn comment_on_post(&mut self, post_id: &str, content: &str) -> Result<String> {
        let user_id = self.current_user_id()?;
        let post = self
            .store
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| anyhow!("post not found: {post_id}"))?;

        let id = fresh_id();
        post.comments.push(Comment {
            id: id.clone(),
            post_id: post_id.to_string(),
            author_id: user_id,
            content: content.to_string(),
            created_at: Utc::now(),
            likes: 0,
        });

        let amount = self.config.rewards.comment;
        self.award(amount, "Posted a comment", Some(id.clone()))?;
        Ok(id)
    }

    // -- sports --

    /// Join a sports event: appends the user, awards participation tokens,
    /// and pushes the confirmation notification.
    pub fn join_sports_event(&mut self, event_id: &str) -> Result<()> {
        let user_id = self.current_user_id()?;
        let title = self
            .store
            .sports_event(event_id)
            .map(|e| e.title.clone())
            .ok_or_else(|| anyhow!("event not found: {event_id}"))?;

        sports::join_event(&mut self.store, event_id, &user_id, Utc::now())
            .map_err(|e| anyhow!(e))?;

        let amount = self.config.rewards.event_participation;
        self.award(amount, "Joined an event", Some(event_id.to_string()))?;
        self.notifications
            .push(&self.db, drafts::event_participation(&title, event_id))?;
        self.log_activity(
            ActivityKind::Participation,
            Section::Sports,
            format!("Signed up for {title}"),
            event_id,
        )?;
        Ok(())
    }

    /// Create a sports event and award creation tokens.
    pub fn create_sports_event(&mut self, new: sports::NewEvent) -> Result<String> {
        let user_id = self.current_user_id()?;
        let id = sports::create_event(&mut self.store, &user_id, new, Utc::now());

        let amount = self.config.rewards.post_creation;
        self.award(amount, "Created a post", Some(id.clone()))?;
        Ok(id)
    }

    // -- food --

    /// Post a menu review and award review tokens.
    pub fn post_food_review(&mut self, new: food::NewReview) -> Result<String> {
        let user_id = self.current_user_id()?;
        let item_name = self
            .store
            .menu_item(&new.menu_item_id)
            .map(|m| m.name.clone())
            .unwrap_or_default();
        let id = food::post_review(&mut self.store, &user_id, new, Utc::now())
            .map_err(|e| anyhow!(e))?;

        let amount = self.config.rewards.review;
        self.award(amount, "Posted a review", Some(id.clone()))?;
        self.log_activity(
            ActivityKind::Review,
            Section::Food,
            format!("Reviewed {item_name}"),
            &id,
        )?;
        Ok(id)
    }

    // -- marketplace --

    /// List an item for sale and award creation tokens.
    pub fn create_market_listing(&mut self, new: marketplace::NewListing) -> Result<String> {
        let user_id = self.current_user_id()?;
        let id = marketplace::create_listing(&mut self.store, &user_id, new, Utc::now());

        let amount = self.config.rewards.post_creation;
        self.award(amount, "Created a post", Some(id.clone()))?;
        Ok(id)
    }

    /// Mark an item sold and push the item-sold notification.
    pub fn mark_item_sold(&mut self, item_id: &str) -> Result<()> {
        let title = self
            .store
            .market_item(item_id)
            .map(|i| i.title.clone())
            .ok_or_else(|| anyhow!("item not found: {item_id}"))?;

        marketplace::mark_sold(&mut self.store, item_id).map_err(|e| anyhow!(e))?;
        self.notifications
            .push(&self.db, drafts::item_sold(&title, item_id))?;
        Ok(())
    }

    // -- research --

    /// Publish a paper and award creation tokens.
    pub fn publish_research_paper(&mut self, new: research::NewPaper) -> Result<String> {
        self.current_user_id()?;
        let id = research::publish_paper(&mut self.store, new, Utc::now());

        let amount = self.config.rewards.post_creation;
        self.award(amount, "Created a post", Some(id.clone()))?;
        Ok(id)
    }

    /// Answer a question and award answer tokens.
    pub fn answer_research_question(
        &mut self,
        question_id: &str,
        content: &str,
    ) -> Result<String> {
        let user_id = self.current_user_id()?;
        let id = research::answer_question(
            &mut self.store,
            question_id,
            &user_id,
            content,
            Utc::now(),
        )
        .map_err(|e| anyhow!(e))?;

        let amount = self.config.rewards.question_answer;
        self.award(amount, "Answered a question", Some(id.clone()))?;
        Ok(id)
    }

    /// Accept an answer as best. When the accepted answer belongs to the
    /// session user, they get the best-answer reward and notification.
    pub fn accept_research_answer(&mut self, question_id: &str, answer_id: &str) -> Result<()> {
        let user_id = self.current_user_id()?;
        let question_title = self
            .store
            .research_questions
            .iter()
            .find(|q| q.id == question_id)
            .map(|q| q.title.clone())
            .ok_or_else(|| anyhow!("question not found: {question_id}"))?;

        let author =
            research::accept_answer(&mut self.store, question_id, answer_id)
                .map_err(|e| anyhow!(e))?;

        if author == user_id {
            let amount = self.config.rewards.best_answer;
            self.award(amount, "Best answer selected", Some(answer_id.to_string()))?;
            self.notifications.push(
                &self.db,
                drafts::answer_accepted(&question_title, question_id),
            )?;
        }
        Ok(())
    }

    // -- career --

    /// Push a deadline warning for every open posting closing within `days`
    /// days. Returns how many warnings were pushed.
    pub fn push_deadline_warnings(&mut self, days: i64) -> Result<usize> {
        let now = Utc::now();
        let closing: Vec<(String, i64)> =
            career::postings_closing_within(&self.store.job_postings, now, days)
                .into_iter()
                .map(|(job, days_left)| {
                    let company = self
                        .store
                        .company(&job.company_id)
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| "Unknown company".to_string());
                    (company, days_left)
                })
                .collect();

        for (company, days_left) in &closing {
            self.notifications
                .push(&self.db, drafts::application_deadline(company, *days_left))?;
        }
        Ok(closing.len())
    }

    // -- messaging --

    /// Append a message from the session user to a conversation.
    pub fn send_chat_message(&mut self, conversation_id: &str, content: &str) -> Result<String> {
        let user_id = self.current_user_id()?;
        crate::chat::thread::append_message(
            &mut self.store,
            conversation_id,
            &user_id,
            &user_id,
            content,
            Utc::now(),
        )
        .map_err(|e| anyhow!(e))
    }

    /// Record a persona reply into a conversation (the caller has already
    /// fetched the text through the relay) and push the new-message
    /// notification.
    pub fn record_persona_reply(&mut self, conversation_id: &str, content: &str) -> Result<String> {
        let user_id = self.current_user_id()?;
        let persona_id = self.config.chat.persona_user_id.clone();
        let sender_name = self
            .store
            .user(&persona_id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| "Someone".to_string());

        let id = crate::chat::thread::append_message(
            &mut self.store,
            conversation_id,
            &persona_id,
            &user_id,
            content,
            Utc::now(),
        )
        .map_err(|e| anyhow!(e))?;

        self.notifications
            .push(&self.db, drafts::new_message(&sender_name, conversation_id))?;
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

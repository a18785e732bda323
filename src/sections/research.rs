// Research section: paper sharing with access control, and open questions.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    AccessLevel, Answer, QuestionStatus, ResearchPaper, ResearchQuestion,
};
use crate::sections::matches_keyword;
use crate::store::{fresh_id, Store};

#[derive(Debug, Error, PartialEq)]
pub enum PaperError {
    #[error("paper not found")]
    PaperNotFound,
    #[error("wrong password for protected paper")]
    WrongPassword,
    #[error("paper is private")]
    Private,
}

#[derive(Debug, Error, PartialEq)]
pub enum QuestionError {
    #[error("question not found")]
    QuestionNotFound,
    #[error("question is closed")]
    Closed,
    #[error("answer not found")]
    AnswerNotFound,
}

/// Papers in one research field.
pub fn papers_by_field<'a>(papers: &'a [ResearchPaper], field: &str) -> Vec<&'a ResearchPaper> {
    papers.iter().filter(|p| p.field == field).collect()
}

/// Keyword search over title, abstract, and keywords.
pub fn search_papers<'a>(papers: &'a [ResearchPaper], keyword: &str) -> Vec<&'a ResearchPaper> {
    papers
        .iter()
        .filter(|p| {
            keyword.is_empty()
                || matches_keyword(&p.title, keyword)
                || matches_keyword(&p.abstract_text, keyword)
                || p.keywords.iter().any(|k| matches_keyword(k, keyword))
        })
        .collect()
}

/// Open a paper for download, enforcing its access level: public papers are
/// always readable, protected papers require the matching password, private
/// papers are never served here. Success counts one download.
pub fn open_paper<'a>(
    store: &'a mut Store,
    paper_id: &str,
    password: Option<&str>,
) -> Result<&'a ResearchPaper, PaperError> {
    let paper = store
        .research_papers
        .iter_mut()
        .find(|p| p.id == paper_id)
        .ok_or(PaperError::PaperNotFound)?;

    match paper.access_level {
        AccessLevel::Public => {}
        AccessLevel::Protected => {
            let supplied = password.ok_or(PaperError::WrongPassword)?;
            if paper.password.as_deref() != Some(supplied) {
                return Err(PaperError::WrongPassword);
            }
        }
        AccessLevel::Private => return Err(PaperError::Private),
    }

    paper.downloads += 1;
    Ok(paper)
}

/// Fields for a newly published paper.
#[derive(Debug, Clone)]
pub struct NewPaper {
    pub title: String,
    pub authors: Vec<String>,
    pub abstract_text: String,
    pub field: String,
    pub keywords: Vec<String>,
    pub files: Vec<String>,
    pub access_level: AccessLevel,
    pub password: Option<String>,
}

/// Publish a paper. Returns the new paper id.
pub fn publish_paper(store: &mut Store, new: NewPaper, now: DateTime<Utc>) -> String {
    let id = fresh_id();
    store.research_papers.push(ResearchPaper {
        id: id.clone(),
        title: new.title,
        authors: new.authors,
        abstract_text: new.abstract_text,
        field: new.field,
        keywords: new.keywords,
        files: new.files,
        access_level: new.access_level,
        password: new.password,
        published_at: now,
        downloads: 0,
        citations: 0,
    });
    id
}

/// Questions still waiting for an accepted answer.
pub fn open_questions(questions: &[ResearchQuestion]) -> Vec<&ResearchQuestion> {
    questions
        .iter()
        .filter(|q| q.status == QuestionStatus::Open)
        .collect()
}

/// Append an answer to an open question. Returns the new answer id.
pub fn answer_question(
    store: &mut Store,
    question_id: &str,
    author_id: &str,
    content: &str,
    now: DateTime<Utc>,
) -> Result<String, QuestionError> {
    let question = store
        .research_questions
        .iter_mut()
        .find(|q| q.id == question_id)
        .ok_or(QuestionError::QuestionNotFound)?;

    if question.status == QuestionStatus::Closed {
        return Err(QuestionError::Closed);
    }

    let id = fresh_id();
    question.answers.push(Answer {
        id: id.clone(),
        question_id: question_id.to_string(),
        author_id: author_id.to_string(),
        content: content.to_string(),
        is_accepted: false,
        votes: 0,
        created_at: now,
    });
    Ok(id)
}

/// Accept one answer as best: marks it accepted and flips the question to
/// `answered`. Returns the accepted answer's author id.
pub fn accept_answer(
    store: &mut Store,
    question_id: &str,
    answer_id: &str,
) -> Result<String, QuestionError> {
    let question = store
        .research_questions
        .iter_mut()
        .find(|q| q.id == question_id)
        .ok_or(QuestionError::QuestionNotFound)?;

    let answer = question
        .answers
        .iter_mut()
        .find(|a| a.id == answer_id)
        .ok_or(QuestionError::AnswerNotFound)?;

    answer.is_accepted = true;
    let author = answer.author_id.clone();
    question.status = QuestionStatus::Answered;
    Ok(author)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

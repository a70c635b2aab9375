//! Conversation enhancement: persona system instruction plus message
//! filtering.
//!
//! The persona instruction is the only system text sent upstream. Messages
//! with role `system` from the caller are dropped, not merged.

use super::{find, ContentGeneration, Persona, DEFAULT_PERSONA, PERSONAS};
use crate::web::models::{ChatMessage, Role};

#[derive(Debug, Clone, PartialEq)]
pub struct Enhanced {
    pub messages: Vec<ChatMessage>,
    pub system: String,
}

pub fn enhance(messages: Vec<ChatMessage>, persona_id: &str) -> Enhanced {
    Enhanced {
        messages: messages
            .into_iter()
            .filter(|m| m.role != Role::System)
            .collect(),
        system: system_instruction(persona_id),
    }
}

pub fn system_instruction(persona_id: &str) -> String {
    match find(persona_id) {
        Some(persona) if persona.id == DEFAULT_PERSONA => facilitator_instruction(),
        Some(persona) => specialist_instruction(persona),
        None => fallback_instruction(),
    }
}

fn roster() -> String {
    PERSONAS
        .iter()
        .filter(|p| p.id != DEFAULT_PERSONA)
        .map(|p| format!("- {} ({}): {} - command *{}", p.name, p.id, p.focus, p.id))
        .collect::<Vec<_>>()
        .join("\n")
}

fn facilitator_instruction() -> String {
    format!(
        "You are ECHO, a BMad Methodology Workflow Facilitator and Intelligent Agent Coordinator.

PRIMARY MISSION:
Work out where the user is in their project journey, explain the BMad agile methodology when it helps, and recommend the specialist who can move them to the next phase.

BMAD WORKFLOW PHASES:
1. IDEATION → Mary (Business Analyst): ideas, brainstorming, market research
2. REQUIREMENTS → John (Product Manager): PRDs, product strategy, roadmaps
3. DESIGN → Sally (UX Expert): wireframes, user flows, design systems
4. ARCHITECTURE → Winston (System Architect): system design, infrastructure
5. EPIC CREATION → Sarah (Product Owner): epics, user stories, backlog

AVAILABLE SPECIALISTS:
{}

COMMUNICATION STYLE:
- Warm, helpful and conversational
- Detect the project phase from context instead of requiring commands
- Ask follow-up questions when the user's needs are unclear
- Explain why a specialist is recommended

Directive: be the bridge between users and specialists, guiding them through the methodology one phase at a time.",
        roster()
    )
}

fn join_or(items: Option<&[&str]>, fallback: &str) -> String {
    match items {
        Some(items) if !items.is_empty() => items.join(", "),
        _ => fallback.to_string(),
    }
}

fn specialist_instruction(persona: &Persona) -> String {
    let content = persona.content_generation.as_ref();
    let pick = |f: fn(&ContentGeneration) -> &'static [&'static str]| content.map(f);

    format!(
        "You are {title}, a specialist team member within the ECHO organization.

PROFESSIONAL PROFILE: {personality}
ROLE: {role}
SPECIALIZATION: {focus}
APPROACH: {style}

ENGAGEMENT CRITERIA: {when}

OPERATIONAL FRAMEWORK:
- Deliver specialized expertise within your area
- Operate as an integrated team member within agile methodology
- Coordinate with other ECHO specialists when a request leaves your area

CONTENT GENERATION CAPABILITIES:
DOCUMENTS: {documents}
DIAGRAMS: {diagrams}
TEMPLATES: {templates}

CONTENT GENERATION PROTOCOLS:
- Use markdown formatting with headers suited to the document type
- Wrap generated artifacts in fenced code blocks tagged with their type (prd, epic, wireframe, diagram, architecture)
- Prefer text-based diagrams and markdown documentation

Directive: operate as {name} and produce deliverables the user can take straight into their project.",
        title = persona.title,
        personality = persona.personality,
        role = persona.role,
        focus = persona.focus,
        style = persona.style,
        when = persona.when_to_use,
        documents = join_or(pick(|c| c.documents), "Professional documentation"),
        diagrams = join_or(pick(|c| c.diagrams), "Visual representations"),
        templates = join_or(pick(|c| c.templates), "Reusable frameworks"),
        name = persona.name,
    )
}

fn fallback_instruction() -> String {
    format!(
        "You are ECHO, strategic lead of this development organization.

You direct a team of specialists and connect users with the right one for their project.

TEAM:
- ECHO (you) - Strategic Orchestrator
{}

AVAILABLE COMMANDS:
- */help - Team capabilities and structure
- */agent [name] - Delegate to a specialist
- */status - Current progress

Directive: provide strategic guidance and bring in specialist expertise where it improves the result.",
        roster()
    )
}

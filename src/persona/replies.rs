//! Canned markdown replies for intercepted commands.

use std::fmt::Write;

use super::{Persona, PERSONAS};

const FACILITATOR_TITLE: &str = "ECHO (Workflow Facilitator)";

fn title_or_default(current: Option<&Persona>) -> &str {
    current.map_or(FACILITATOR_TITLE, |p| p.title)
}

pub fn help(current: Option<&Persona>) -> String {
    format!(
        "# ECHO - BMad Methodology Workflow Guide

## Welcome! I'm ECHO, Your BMad Workflow Facilitator

I connect you with the right specialist at the right time. Tell me about your project and I will recommend the expert who can move it forward.

## BMad Methodology Workflow

**1. IDEATION PHASE** → *Mary (Business Analyst)*
• Brainstorming, market research, competitive analysis
• Command: `*analyst` or `*brainstorm`

**2. REQUIREMENTS PHASE** → *John (Product Manager)*
• PRD creation, product strategy, roadmap planning
• Command: `*pm`

**3. DESIGN PHASE** → *Sally (UX Expert)*
• User experience, wireframes, design systems
• Command: `*ux-expert`

**4. ARCHITECTURE PHASE** → *Winston (System Architect)*
• Technical architecture, system design, infrastructure
• Command: `*architect`

**5. EPIC CREATION PHASE** → *Sarah (Product Owner)*
• Epic breakdown, user stories, sprint planning
• Command: `*po`

## Quick Commands

• `*help` - Show this guide
• `*workflow` - Show your current position in BMad process
• `*status` - Current progress and next steps
• `*agent [name]` - Switch to a specialist by name
• `*analyst` or `*brainstorm` - Start ideation phase
• `*pm` - Move to requirements/PRD phase
• `*ux-expert` - Begin design phase
• `*architect` - Start architecture phase
• `*po` - Epic creation and story breakdown

**Current Specialist:** {}

Let me know what you're working on, and I'll guide you to the right specialist!",
        title_or_default(current)
    )
}

pub fn switched(persona: &Persona) -> String {
    format!(
        "# Specialist Engagement: {title}

**Professional Introduction:** I am **{name}**, {personality}

**Role & Responsibilities:** {role}
**Area of Specialization:** {focus}
**Engagement Criteria:** {when}

**Professional Approach:**
I operate with {style} methodology as an integrated member of the ECHO organization.

**Next Steps:** {next}

**Team Coordination:** Use `*/agent [name]` for specialist delegation or `*/help` for organizational directory.",
        title = persona.title,
        name = persona.name,
        personality = persona.personality,
        role = persona.role,
        focus = persona.focus,
        when = persona.when_to_use,
        style = persona.style.to_lowercase(),
        next = persona.next_step,
    )
}

pub fn invalid_selection(requested: &str) -> String {
    let mut out = format!(
        "# Invalid Specialist Designation: \"{}\"\n\n**Available ECHO Organization Members:**\n\n",
        requested
    );
    for persona in PERSONAS {
        let _ = writeln!(
            out,
            "• **{}** - {} (Command: {})",
            persona.name, persona.role, persona.id
        );
    }
    out.push_str(
        "\n**Correct Usage:** `*/agent analyst` or `*/help` for organizational directory\n\n\
         **Note:** Precise command syntax is required for effective specialist delegation.",
    );
    out
}

pub fn directory(current: Option<&Persona>) -> String {
    let mut out = String::from(
        "# ECHO Organization - Complete Specialist Directory\n\n**Available Professional Team Members:**\n\n",
    );
    for persona in PERSONAS {
        let _ = writeln!(
            out,
            "• **{}** (`*/agent {}`) - {}",
            persona.name, persona.id, persona.role
        );
    }
    let _ = write!(
        out,
        "\n**Current Active Leadership:** {}\n\n**Delegation Protocol:** Use `*/agent [name]` for specialist engagement",
        title_or_default(current)
    );
    out
}

pub fn status(current: Option<&Persona>) -> String {
    format!(
        "# ECHO - Current Status

**Your Workflow Facilitator:** ECHO - BMad Methodology Guide
**Active Specialist:** {}
**Current Focus:** {}

## Available Assistance
• **Need ideas explored?** → Connect with Mary (Business Analyst)
• **Need requirements structured?** → Connect with John (Product Manager)
• **Need user experience designed?** → Connect with Sally (UX Expert)
• **Need technical architecture?** → Connect with Winston (System Architect)
• **Need stories and epics?** → Connect with Sarah (Product Owner)

## Quick Commands
• `*workflow` - See your position in the BMad methodology
• `*help` - View complete specialist guide",
        title_or_default(current),
        current.map_or(
            "Connecting you with the right specialist for your project needs",
            |p| p.focus
        ),
    )
}

pub fn workflow(current: Option<&Persona>) -> String {
    let mut out = format!(
        "# BMad Workflow Status\n\n## Current Position\n**Phase:** {}\n**Active Specialist:** {}\n\n## BMad Methodology Progress\n",
        current.map_or("Unknown Phase", |p| p.phase),
        title_or_default(current),
    );

    let stages = PERSONAS.iter().filter_map(|p| p.stage.map(|stage| (p, stage)));
    let mut step = 0;
    for (persona, stage) in stages {
        step += 1;
        let here = current.is_some_and(|c| c.id == persona.id);
        if here {
            let _ = writeln!(out, "{}. → **{}** ← (You are here)", step, stage);
        } else {
            let _ = writeln!(out, "{}. {}", step, stage);
        }
    }
    let _ = writeln!(out, "{}. **DEVELOPMENT** - Sprint Cycles & Implementation", step + 1);

    let _ = write!(
        out,
        "\n## Current Focus\n{}\n\n## Next Recommended Step\n{}\n\n## Quick Actions\n\
         • `*help` - View all specialists and workflow guide\n\
         • `*status` - Check current progress",
        current.map_or("Workflow facilitation and specialist coordination", |p| p.focus),
        current.map_or(
            "Continue with current specialist or use *help for guidance",
            |p| p.next_phase
        ),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::find;

    #[test]
    fn test_invalid_selection_lists_every_persona() {
        let text = invalid_selection("wizard");
        assert!(text.contains("\"wizard\""));
        for persona in PERSONAS {
            assert!(text.contains(persona.id), "missing {}", persona.id);
        }
    }

    #[test]
    fn test_workflow_marks_current_stage() {
        let text = workflow(find("architect"));
        assert!(text.contains("→ **ARCHITECTURE** ← (You are here)"));
        assert!(!text.contains("→ **IDEATION**"));
        assert!(text.contains("6. **DEVELOPMENT**"));
    }

    #[test]
    fn test_unknown_current_persona_uses_facilitator_title() {
        assert!(help(None).contains(FACILITATOR_TITLE));
        assert!(workflow(None).contains("Unknown Phase"));
    }

    #[test]
    fn test_switched_reply_mentions_persona() {
        let text = switched(find("po").unwrap());
        assert!(text.starts_with("# Specialist Engagement: Sarah - Product Owner"));
        assert!(text.contains("systematic, detail-oriented"));
    }
}

//! Human-readable descriptions of each standard workflow step.

/// Sentences used when reporting on one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPhrases {
    pub step: &'static str,
    /// Completes "We need to ...".
    pub todo: &'static str,
    /// Completes "We ...".
    pub done: &'static str,
    pub definition_complete: &'static str,
}

pub static PHRASES: [StepPhrases; 10] = [
    StepPhrases {
        step: "issue",
        todo: "address the issue gifted to us by our dear customer",
        done: "received the issue from our dear customer",
        definition_complete: "The issue has been acknowledged",
    },
    StepPhrases {
        step: "plan",
        todo: "create a plan to address the issue",
        done: "created a plan to address the issue",
        definition_complete: "A plan has been created and approved to address the issue.",
    },
    StepPhrases {
        step: "prerequisites",
        todo: "identify the prerequisites needed to carry out the plan",
        done: "identified the prerequisites needed to carry out the plan",
        definition_complete: "All necessary prerequisites have been identified and are available to carry out the plan.",
    },
    StepPhrases {
        step: "team",
        todo: "assemble the team of people with product/process knowledge to carry out the plan",
        done: "assembled the team of people with product/process knowledge to carry out the plan",
        definition_complete: "A team with the appropriate knowledge and skills has been assembled to carry out the plan.",
    },
    StepPhrases {
        step: "problem_description",
        todo: "specify the problem by identifying in quantifiable terms the who, what, where, when, why, how, and how many (5W2H) for the problem",
        done: "specified the problem by identifying in quantifiable terms the who, what, where, when, why, how, and how many (5W2H) for the problem",
        definition_complete: "The problem has been described in detail identifying in quantifiable terms the who, what, where, when, why, how, and how many (5W2H) for the problem.",
    },
    StepPhrases {
        step: "interim_containment_plan",
        todo: "define and implement containment actions to isolate the problem from any customer",
        done: "defined and implemented containment actions to isolate the problem from any customer",
        definition_complete: "An interim containment plan has been put in place to isolate the problem from any customers.",
    },
    StepPhrases {
        step: "root_causes",
        todo: "determine, identify and verify all applicable causes that could explain why the problem occurred",
        done: "determined, identified and verified all applicable causes that could explain why the problem occurred",
        definition_complete: "All applicable causes of the problem have been identified and verified, and a clear understanding of why the problem was not noticed at the time it occurred has been determined.",
    },
    StepPhrases {
        step: "permanent_corrections",
        todo: "develop a set of permanent corrections to address the root causes",
        done: "developed a set of permanent corrections to address the root causes",
        definition_complete: "A set of permanent corrections has been developed and implemented to address the root causes of the problem.",
    },
    StepPhrases {
        step: "corrective_actions",
        todo: "carry out corrective actions to address the immediate symptoms",
        done: "carried out corrective actions to address the immediate symptoms",
        definition_complete: "Corrective actions have been taken to address the immediate symptoms of the problem.",
    },
    StepPhrases {
        step: "preventive_measures",
        todo: "put in place preventive measures to ensure the problem doesn't recur",
        done: "put in place preventive measures to ensure the problem doesn't recur",
        definition_complete: "Completed modifications of the management systems, operation systems, practices, and procedures to prevent recurrence of this and all similar problems",
    },
];

pub fn phrases_for(step: &str) -> Option<&'static StepPhrases> {
    PHRASES.iter().find(|phrases| phrases.step == step)
}

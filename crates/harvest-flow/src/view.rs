//! Serializable flow snapshot for the presentation layer.

use harvest_core::{CropType, HarvestDraft, LocationFix, SubmissionResult, VerificationLinks};
use serde::Serialize;
use ts_rs::TS;

use crate::location::LocationStatus;
use crate::submission::{FlowPhase, HarvestSubmissionFlow};

/// Everything a form, spinner, or confirmation screen renders from.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FlowView {
    pub phase: FlowPhase,
    pub draft: HarvestDraft,
    pub location_status: LocationStatus,
    /// The acquired fix, formatted for display.
    pub location_label: Option<String>,
    pub can_submit: bool,
    /// Why submit is disabled, one message per problem.
    pub problems: Vec<String>,
    pub crop_options: Vec<String>,
    pub result: Option<SubmissionResult>,
    pub links: Option<VerificationLinks>,
    pub last_error: Option<String>,
}

impl FlowView {
    pub(crate) fn capture(flow: &HarvestSubmissionFlow) -> Self {
        let draft = flow.draft().clone();
        let mut problems: Vec<String> = draft.problems().iter().map(|p| p.to_string()).collect();
        if draft.location.is_some() && !flow.location().is_acquired() {
            problems.push("location must be captured again".to_string());
        }

        FlowView {
            phase: flow.phase(),
            location_status: flow.location().status(),
            location_label: flow.location().fix().as_ref().map(LocationFix::to_string),
            can_submit: flow.can_submit(),
            problems,
            crop_options: CropType::labels(),
            result: flow.result().cloned(),
            links: flow.links().cloned(),
            last_error: flow.last_error().map(str::to_string),
            draft,
        }
    }
}

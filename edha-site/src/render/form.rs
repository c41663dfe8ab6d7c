//! Form status line rendering.

use edha_core::escape_html;

use crate::forms::{FormKind, FormStatus};

/// Renders the status line shown under a form.
///
/// `aria-busy` is set while controls are disabled.
pub fn render_form_status(kind: FormKind, status: &FormStatus) -> String {
    let message = status.message.as_deref().map(escape_html).unwrap_or_default();
    let busy = if status.controls_enabled {
        ""
    } else {
        r#" aria-busy="true""#
    };

    format!(
        r#"<p class="form-status" id="{kind}Status" data-state="{}"{busy}>{message}</p>"#,
        status.state.as_str(),
    )
}

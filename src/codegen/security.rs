//! HSTS / CORS response headers.

use super::{condition_command, TranslationResult, SERVICE_ID, VERSION_NUMBER};
use crate::rule::Rule;

pub(super) fn generate(rule: &Rule, condition: &str) -> TranslationResult {
    let header = rule.security();
    let (name, value) = (header.name(), header.value());
    let key = rule.security_header.to_uppercase();
    let condition_name = format!("CF_{key}_Condition");

    let mut cli = condition_command(&rule.url_pattern, &condition_name, condition);
    cli.push_str(&format!(
        r#"
# 2. Define the Header Action
fastly header create --service-id {SERVICE_ID} --version {VERSION_NUMBER} \
    --name "CF_{key}_Header" --type "response" \
    --action "set" --dst "{name}" --src "{value}" \
    --condition "{condition_name}"
"#
    ));

    let vcl = format!(
        r##"# VCL Snippet: vcl_deliver (Apply this in the VCL Snippets tab)
# This VCL snippet modifies the response before it is sent to the client.
if ({condition}) {{
    set resp.http.{name} = "{value}";
}}
"##
    );

    TranslationResult {
        title: format!("Security Header: {name}"),
        description: "Fastly equivalent uses a Response Header object with a Request Condition (or applied globally)."
            .to_string(),
        cli,
        vcl,
    }
}

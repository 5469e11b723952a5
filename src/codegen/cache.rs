//! Caching/TTL override.

use super::{condition_command, TranslationResult, SERVICE_ID, VERSION_NUMBER};
use crate::rule::Rule;

const CONDITION_NAME: &str = "CF_Cache_Override";

pub(super) fn generate(rule: &Rule, condition: &str) -> TranslationResult {
    let ttl = rule.resolved_ttl();

    let mut cli = condition_command(&rule.url_pattern, CONDITION_NAME, condition);
    cli.push_str(&format!(
        r#"
# 2. Define the Cache Setting
fastly cache-setting create --service-id {SERVICE_ID} --version {VERSION_NUMBER} \
    --name "CF_Cache_TTL" --action "deliver" \
    --ttl {ttl} --stale-ttl {ttl} --condition "{CONDITION_NAME}"
"#
    ));

    let vcl = format!(
        r##"# VCL Snippet: vcl_recv (Apply this in the VCL Snippets tab)
# Note: You must apply the condition in vcl_recv.
if ({condition}) {{
    # Set the TTL for this request specifically.
    # Fastly uses 'beresp.ttl' in vcl_fetch for origin-side control.
    # To override immediately, you typically adjust caching headers in vcl_recv
    # or use the UI Cache Setting (preferred). This simulates VCL for demonstration.
    set req.max_age = {ttl};
    return(lookup);
}}
"##
    );

    TranslationResult {
        title: "Caching/TTL Override".to_string(),
        description: "Fastly equivalent uses a Cache Setting applied via a Request Condition."
            .to_string(),
        cli,
        vcl,
    }
}

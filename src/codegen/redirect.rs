//! Forwarding URL.

use super::{condition_command, TranslationResult, SERVICE_ID, VERSION_NUMBER};
use crate::rule::Rule;

const CONDITION_NAME: &str = "CF_Redirect_Condition";

pub(super) fn generate(rule: &Rule, condition: &str) -> TranslationResult {
    let status = rule.redirect_status();
    let (code, phrase) = (status.code, status.phrase);
    let location = &rule.redirect_url;

    let mut cli = condition_command(&rule.url_pattern, CONDITION_NAME, condition);
    cli.push_str(&format!(
        r#"
# 2. Define the Response Object (The Redirect Action)
fastly response-object create --service-id {SERVICE_ID} --version {VERSION_NUMBER} \
    --name "CF_Redirect_Action" --status {code} --response "{phrase}" \
    --content-type "text/html" \
    --header "Location: {location}" --condition "{CONDITION_NAME}"
"#
    ));

    // vcl_recv raises the synthetic error, vcl_error turns it into the redirect.
    let vcl = format!(
        r##"# VCL Snippet: vcl_recv (Apply this in the VCL Snippets tab)
# This VCL snippet performs an immediate redirect at the edge.
if ({condition}) {{
    error {code} "{phrase}";
}}

# VCL Snippet: vcl_error (Apply this in the VCL Snippets tab)
# Handle the custom error code and set the Location header.
if (obj.status == {code}) {{
    set obj.status = {code};
    set obj.response = "{phrase}";
    set obj.http.Location = "{location}";
    synthetic(req.url); # Generate a minimal response body
    return(deliver);
}}
"##
    );

    TranslationResult {
        title: "Forwarding URL (Redirect)".to_string(),
        description: "Fastly equivalent uses a Response Object and a Request Condition."
            .to_string(),
        cli,
        vcl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::ActionType;

    fn rule(redirect_type: &str, redirect_url: &str) -> Rule {
        Rule {
            url_pattern: "*old.example.com/*".to_string(),
            action_type: Some(ActionType::Redirect),
            redirect_type: redirect_type.to_string(),
            redirect_url: redirect_url.to_string(),
            ..Rule::default()
        }
    }

    const CONDITION: &str = r#"req.url ~ "old\.example\.com/.*""#;

    #[test]
    fn test_permanent_redirect() {
        let result = generate(&rule("301", "https://new.example.com/"), CONDITION);

        assert_eq!(result.title, "Forwarding URL (Redirect)");
        assert!(result
            .cli
            .contains("--name \"CF_Redirect_Action\" --status 301 --response \"Moved Permanently\""));
        assert!(result
            .cli
            .contains("--header \"Location: https://new.example.com/\" --condition \"CF_Redirect_Condition\""));
        assert!(result.vcl.contains("    error 301 \"Moved Permanently\";\n"));
        assert!(result.vcl.contains("if (obj.status == 301) {\n"));
        assert!(result
            .vcl
            .contains("    set obj.http.Location = \"https://new.example.com/\";\n"));
        assert!(result.vcl.contains("    return(deliver);\n"));
    }

    #[test]
    fn test_temporary_redirect() {
        let result = generate(&rule("302", "https://new.example.com/"), CONDITION);
        assert!(result.cli.contains("--status 302 --response \"Found\""));
        assert!(result.vcl.contains("error 302 \"Found\";"));
        assert!(result.vcl.contains("set obj.response = \"Found\";"));
    }

    #[test]
    fn test_empty_location_passes_through() {
        let result = generate(&rule("301", ""), CONDITION);
        assert!(result.cli.contains("--header \"Location: \""));
        assert!(result.vcl.contains("set obj.http.Location = \"\";"));
    }

    #[test]
    fn test_vcl_has_recv_and_error_stages() {
        let result = generate(&rule("301", "https://x/"), CONDITION);
        let recv = result.vcl.find("vcl_recv").unwrap();
        let error = result.vcl.find("vcl_error").unwrap();
        assert!(recv < error);
    }
}

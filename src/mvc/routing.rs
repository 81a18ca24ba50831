//! Controller/action naming and redirect instructions.
//!
//! Routes follow the `/{controller}/{action}/...` convention with kebab-case
//! segments. `RouteData` recovers the PascalCase names from a path and
//! `RedirectInstruction` maps names back to a location.

use url::form_urlencoded;

use crate::config::{
    ACCESS_DENIED_ACTION, ACCESS_DENIED_CONTROLLER, DEFAULT_ACTION, DEFAULT_CONTROLLER,
    DEFAULT_SUCCESS_WAIT_SECONDS, SUCCESS_PAGE_ACTION, SUCCESS_PAGE_CONTROLLER,
};
use crate::utils::{is_route_name, to_kebab_case, to_pascal_case};

/// Controller and action names of the executing handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteData {
    pub controller: String,
    pub action: String,
}

impl RouteData {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
        }
    }

    /// Derive names from a matched route path such as `/notes/edit/:id`.
    /// Parameter segments are skipped; missing names default to
    /// `Home` / `Index`.
    pub fn from_path(path: &str) -> Self {
        let mut names = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .filter(|segment| !segment.starts_with(':') && !segment.starts_with('{') && !segment.starts_with('*'))
            .map(to_pascal_case);

        let controller = names.next().unwrap_or_else(|| DEFAULT_CONTROLLER.to_string());
        let action = names.next().unwrap_or_else(|| DEFAULT_ACTION.to_string());

        Self { controller, action }
    }
}

impl Default for RouteData {
    fn default() -> Self {
        Self::new(DEFAULT_CONTROLLER, DEFAULT_ACTION)
    }
}

/// Where to redirect and with which query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectInstruction {
    pub action: String,
    pub controller: String,
    /// Query parameters, in emission order
    pub params: Vec<(String, String)>,
}

impl RedirectInstruction {
    pub fn to_action(action: impl Into<String>, controller: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            controller: controller.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Value of a parameter by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Location URL: `/{controller}/{action}?k=v`. Names that are not
    /// route-shaped fall back to `Home` / `Index`, so the location always
    /// stays on this site.
    pub fn location(&self) -> String {
        let mut location = format!(
            "/{}/{}",
            to_kebab_case(route_segment(&self.controller, DEFAULT_CONTROLLER)),
            to_kebab_case(route_segment(&self.action, DEFAULT_ACTION))
        );

        if !self.params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.params.iter())
                .finish();
            location.push('?');
            location.push_str(&query);
        }

        location
    }

    /// Redirect to the access denied page, remembering the requested URL.
    pub fn access_denied(page_url: impl Into<String>) -> Self {
        Self::to_action(ACCESS_DENIED_ACTION, ACCESS_DENIED_CONTROLLER).param("pageUrl", page_url.into())
    }
}

fn route_segment<'a>(name: &'a str, fallback: &'a str) -> &'a str {
    if is_route_name(name) {
        name
    } else {
        tracing::warn!(name = %name, "Rejected redirect target name");
        fallback
    }
}

/// Builder for the success interstitial redirect.
///
/// ```
/// use rust_mvc_starter::mvc::SuccessRedirect;
///
/// let redirect = SuccessRedirect::new("Payment complete")
///     .returning_to("List", "Orders")
///     .wait_seconds(5)
///     .into_instruction();
/// assert_eq!(redirect.get("retController"), Some("Orders"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessRedirect {
    page_title: String,
    action: String,
    controller: String,
    wait_seconds: u32,
}

impl SuccessRedirect {
    pub fn new(page_title: impl Into<String>) -> Self {
        Self {
            page_title: page_title.into(),
            action: DEFAULT_ACTION.to_string(),
            controller: DEFAULT_CONTROLLER.to_string(),
            wait_seconds: DEFAULT_SUCCESS_WAIT_SECONDS,
        }
    }

    /// Action and controller to return to after the countdown
    pub fn returning_to(mut self, action: impl Into<String>, controller: impl Into<String>) -> Self {
        self.action = action.into();
        self.controller = controller.into();
        self
    }

    /// How long the success page stays on screen
    pub fn wait_seconds(mut self, seconds: u32) -> Self {
        self.wait_seconds = seconds;
        self
    }

    pub fn into_instruction(self) -> RedirectInstruction {
        RedirectInstruction::to_action(SUCCESS_PAGE_ACTION, SUCCESS_PAGE_CONTROLLER)
            .param("pageTitle", self.page_title)
            .param("retAction", self.action)
            .param("retController", self.controller)
            .param("waitSeconds", self.wait_seconds)
    }
}

impl From<&str> for SuccessRedirect {
    fn from(page_title: &str) -> Self {
        Self::new(page_title)
    }
}

impl From<String> for SuccessRedirect {
    fn from(page_title: String) -> Self {
        Self::new(page_title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_data_from_path() {
        assert_eq!(RouteData::from_path("/notes/edit/:id"), RouteData::new("Notes", "Edit"));
        assert_eq!(RouteData::from_path("/home/success-page"), RouteData::new("Home", "SuccessPage"));
        assert_eq!(RouteData::from_path("/notes"), RouteData::new("Notes", "Index"));
        assert_eq!(RouteData::from_path("/"), RouteData::new("Home", "Index"));
        assert_eq!(RouteData::from_path("/notes/preview/{id}"), RouteData::new("Notes", "Preview"));
    }

    #[test]
    fn test_success_redirect_defaults() {
        let redirect = SuccessRedirect::new("Payment complete").into_instruction();

        assert_eq!(redirect.action, "SuccessPage");
        assert_eq!(redirect.controller, "Home");
        assert_eq!(
            redirect.params,
            vec![
                ("pageTitle".to_string(), "Payment complete".to_string()),
                ("retAction".to_string(), "Index".to_string()),
                ("retController".to_string(), "Home".to_string()),
                ("waitSeconds".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_success_redirect_location_is_encoded() {
        let location = SuccessRedirect::from("Saved & done")
            .returning_to("Index", "Notes")
            .into_instruction()
            .location();

        assert_eq!(
            location,
            "/home/success-page?pageTitle=Saved+%26+done&retAction=Index&retController=Notes&waitSeconds=3"
        );
    }

    #[test]
    fn test_access_denied_carries_page_url() {
        let redirect = RedirectInstruction::access_denied("/notes/edit/1?x=2");

        assert_eq!(redirect.controller, "Security");
        assert_eq!(redirect.action, "AccessDenied");
        assert_eq!(redirect.get("pageUrl"), Some("/notes/edit/1?x=2"));
        assert_eq!(redirect.location(), "/security/access-denied?pageUrl=%2Fnotes%2Fedit%2F1%3Fx%3D2");
    }

    #[test]
    fn test_location_without_params() {
        let redirect = RedirectInstruction::to_action("Index", "Notes");
        assert_eq!(redirect.location(), "/notes/index");
    }

    #[test]
    fn test_location_rejects_off_site_names() {
        assert_eq!(RedirectInstruction::to_action("x", "/evil.example").location(), "/home/x");
        assert_eq!(RedirectInstruction::to_action("//evil", "Notes").location(), "/notes/index");
        assert_eq!(
            RedirectInstruction::to_action("Index", "http://evil.example").location(),
            "/home/index"
        );
    }
}

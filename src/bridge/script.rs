//! Page script injected into the embedded view.
//!
//! The only interception done inside the page is `window.open`: page script
//! can't be trusted to open URLs natively, so the call is turned into an
//! `openLink` message and navguard decides. Relative targets are resolved
//! against the page's base URL first. The original `window.open` is
//! not called afterwards, otherwise the same URL would be handled twice.
//!
//! Anchor clicks are left alone. They surface as `navigation`
//! events and are handled there, in one place.

use crate::bridge::protocol::OPEN_LINK_TYPE;

/// Name of the host-provided object with a `postMessage(string)` method.
/// React Native WebView and most embeddings expose it under this name.
pub const DEFAULT_CHANNEL: &str = "ReactNativeWebView";

const TEMPLATE: &str = r#"(function() {
  if (window.__navguardInstalled) { return; }
  window.__navguardInstalled = true;
  var channel = window["__CHANNEL__"];
  window.open = function(url) {
    if (!url || !channel || typeof channel.postMessage !== "function") { return null; }
    var target = String(url);
    try {
      target = new URL(target, document.baseURI).href;
    } catch (e) {}
    channel.postMessage(JSON.stringify({ type: "__TYPE__", url: target }));
    return null;
  };
})();
true;"#;

/// The bridge script for the default channel.
pub fn bridge_script() -> String {
    bridge_script_for(DEFAULT_CHANNEL)
}

/// The bridge script posting to `window[channel]`.
pub fn bridge_script_for(channel: &str) -> String {
    // The channel name ends up inside a JS string literal.
    let escaped = serde_json::to_string(channel).unwrap_or_else(|_| "\"\"".to_string());
    let escaped = escaped
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or("");
    TEMPLATE
        .replace("__CHANNEL__", escaped)
        .replace("__TYPE__", OPEN_LINK_TYPE)
}

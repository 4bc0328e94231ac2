//! Initialization script injected into the loaded page.
//!
//! Runs before the page's own scripts on every load. It reports the page's
//! favicon to the shell whenever it changes, and answers permission requests
//! from the [`policy`](super::policy) table so the page never sees a prompt.
//! The page's `Notification` constructor is replaced with one that goes
//! through the shell, since the webviews never deliver web notifications.

use super::policy::{decide, PermissionKind};

/// IPC command the page calls with its current favicon href.
pub const REPORT_FAVICON_COMMAND: &str = "report_favicon";

/// IPC command behind the page's `Notification` constructor.
pub const NOTIFY_COMMAND: &str = "notify";

/// Delay before a failed favicon report is retried.
const REPORT_RETRY_MS: u32 = 1000;
const REPORT_MAX_RETRIES: u32 = 10;

/// JSON object mapping permission names to `"granted"` / `"denied"`.
fn permission_table() -> String {
    let entries: Vec<String> = PermissionKind::KNOWN
        .iter()
        .map(|kind| format!("{:?}: {:?}", kind.name(), decide(kind).as_state()))
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

/// Build the full initialization script.
pub fn init_script() -> String {
    let notifications = decide(&PermissionKind::Notifications).as_state();
    FAVICON_REPORTER
        .replace("__COMMAND__", REPORT_FAVICON_COMMAND)
        .replace("__RETRY_MS__", &REPORT_RETRY_MS.to_string())
        .replace("__MAX_RETRIES__", &REPORT_MAX_RETRIES.to_string())
        + &PERMISSION_GUARD
            .replace("__TABLE__", &permission_table())
            .replace("__NOTIFY__", NOTIFY_COMMAND)
            .replace("__NOTIFICATIONS__", notifications)
}

const FAVICON_REPORTER: &str = r#"
(function () {
  if (window.top !== window) { return; }
  var last;
  var retries = 0;
  function currentIcon() {
    var link = document.querySelector('link[rel~="icon"], link[rel="shortcut icon"]');
    return link && link.href ? link.href : null;
  }
  function report() {
    var href = currentIcon();
    if (href === last) { return; }
    last = href;
    var ipc = window.__TAURI_INTERNALS__;
    if (!ipc || typeof ipc.invoke !== 'function') { return; }
    ipc.invoke('__COMMAND__', { href: href }).then(function () {
      retries = 0;
    }, function () {
      if (last !== href) { return; }
      last = undefined;
      if (retries < __MAX_RETRIES__) {
        retries += 1;
        setTimeout(report, __RETRY_MS__);
      }
    });
  }
  function watch() {
    report();
    new MutationObserver(report).observe(document.head || document.documentElement, {
      subtree: true,
      childList: true,
      attributes: true,
      attributeFilter: ['href', 'rel']
    });
  }
  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', watch, { once: true });
  } else {
    watch();
  }
  window.addEventListener('load', function () {
    last = undefined;
    report();
  });
})();
"#;

const PERMISSION_GUARD: &str = r#"
(function () {
  var table = __TABLE__;
  function stateOf(name) { return table[name] || 'denied'; }
  function denied() { return new DOMException('Permission denied', 'NotAllowedError'); }

  var allowNotifications = '__NOTIFICATIONS__' === 'granted';

  function ShellNotification(title, options) {
    if (!(this instanceof ShellNotification)) {
      throw new TypeError("Failed to construct 'Notification': Please use the 'new' operator.");
    }
    var opts = options || {};
    var self = this;
    this.title = String(title);
    this.body = opts.body == null ? '' : String(opts.body);
    this.tag = opts.tag == null ? '' : String(opts.tag);
    this.icon = opts.icon == null ? '' : String(opts.icon);
    this.data = opts.data === undefined ? null : opts.data;
    this.silent = !!opts.silent;
    this.onclick = null;
    this.onshow = null;
    this.onerror = null;
    this.onclose = null;
    this._listeners = {};

    var ipc = window.__TAURI_INTERNALS__;
    if (!allowNotifications || !ipc || typeof ipc.invoke !== 'function') {
      setTimeout(function () { fire(self, 'error'); }, 0);
      return;
    }
    ipc.invoke('__NOTIFY__', { title: this.title, body: this.body || null }).then(
      function () { fire(self, 'show'); },
      function () { fire(self, 'error'); }
    );
  }

  function fire(target, type) {
    var event = { type: type, target: target };
    var handler = target['on' + type];
    if (typeof handler === 'function') { handler.call(target, event); }
    (target._listeners[type] || []).slice().forEach(function (fn) { fn.call(target, event); });
  }

  ShellNotification.prototype.addEventListener = function (type, fn) {
    (this._listeners[type] = this._listeners[type] || []).push(fn);
  };
  ShellNotification.prototype.removeEventListener = function (type, fn) {
    var list = this._listeners[type] || [];
    var index = list.indexOf(fn);
    if (index >= 0) { list.splice(index, 1); }
  };
  ShellNotification.prototype.close = function () { fire(this, 'close'); };

  Object.defineProperty(ShellNotification, 'permission', {
    configurable: true,
    get: function () { return '__NOTIFICATIONS__'; }
  });
  ShellNotification.maxActions = 0;
  ShellNotification.requestPermission = function (callback) {
    if (typeof callback === 'function') { callback('__NOTIFICATIONS__'); }
    return Promise.resolve('__NOTIFICATIONS__');
  };

  try {
    Object.defineProperty(window, 'Notification', {
      configurable: true,
      writable: true,
      value: ShellNotification
    });
  } catch (e) {
    window.Notification = ShellNotification;
  }

  if (navigator.permissions && navigator.permissions.query) {
    navigator.permissions.query = function (descriptor) {
      var name = descriptor && descriptor.name;
      return Promise.resolve({
        name: name,
        state: stateOf(name),
        onchange: null,
        addEventListener: function () {},
        removeEventListener: function () {}
      });
    };
  }

  if (navigator.mediaDevices && navigator.mediaDevices.getUserMedia) {
    var getUserMedia = navigator.mediaDevices.getUserMedia.bind(navigator.mediaDevices);
    navigator.mediaDevices.getUserMedia = function (constraints) {
      var wants = constraints || {};
      if ((wants.video && stateOf('camera') !== 'granted') ||
          (wants.audio && stateOf('microphone') !== 'granted')) {
        return Promise.reject(denied());
      }
      return getUserMedia(constraints);
    };
  }

  if (navigator.geolocation && stateOf('geolocation') !== 'granted') {
    var refuse = function (success, error) {
      if (typeof error === 'function') {
        error({ code: 1, message: 'User denied Geolocation', PERMISSION_DENIED: 1 });
      }
      return 0;
    };
    navigator.geolocation.getCurrentPosition = refuse;
    navigator.geolocation.watchPosition = refuse;
  }

  if (navigator.clipboard && navigator.clipboard.read && stateOf('clipboard-read') !== 'granted') {
    navigator.clipboard.read = function () { return Promise.reject(denied()); };
    navigator.clipboard.readText = function () { return Promise.reject(denied()); };
  }
})();
"#;

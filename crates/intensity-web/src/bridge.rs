//! Capacitor plugin access: the actuator bridge and the haptics plugin.
//!
//! Plugins are looked up under `window.Capacitor.Plugins`. In a plain browser
//! they are absent and every actuator call fails with `Unavailable`.

use crate::constants::{ACTUATOR_PLUGIN, HAPTICS_PLUGIN};
use intensity_core::{
    ActuatorBridge, BridgeError, BridgeFuture, CameraInfo, CommandAck, HapticStrength,
    HardwareCommand, HardwareTelemetry,
};
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn capacitor_plugin(name: &str) -> Option<JsValue> {
    let window = web::window()?;
    let cap = Reflect::get(&window, &JsValue::from_str("Capacitor")).ok()?;
    let plugins = Reflect::get(&cap, &JsValue::from_str("Plugins")).ok()?;
    let plugin = Reflect::get(&plugins, &JsValue::from_str(name)).ok()?;
    (!plugin.is_undefined() && !plugin.is_null()).then_some(plugin)
}

fn js_error_message(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

#[inline]
fn set(obj: &Object, key: &str, value: JsValue) {
    _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

#[inline]
fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn get_string(obj: &JsValue, key: &str) -> Option<String> {
    let v = get(obj, key);
    v.as_string().or_else(|| v.as_f64().map(|n| n.to_string()))
}

/// Invoke `plugin[method](arg)` and wrap the returned promise.
fn call(plugin: &JsValue, method: &str, arg: Option<&JsValue>) -> Result<Promise, BridgeError> {
    let func = get(plugin, method)
        .dyn_into::<Function>()
        .map_err(|_| BridgeError::Malformed(format!("{method} is not a function")))?;
    let ret = match arg {
        Some(a) => func.call1(plugin, a),
        None => func.call0(plugin),
    }
    .map_err(|e| BridgeError::Rejected(js_error_message(&e)))?;
    ret.dyn_into::<Promise>()
        .map_err(|_| BridgeError::Malformed(format!("{method} did not return a promise")))
}

async fn settle(promise: Result<Promise, BridgeError>) -> Result<JsValue, BridgeError> {
    let promise = promise?;
    JsFuture::from(promise)
        .await
        .map_err(|e| BridgeError::Rejected(js_error_message(&e)))
}

fn command_args(command: &HardwareCommand) -> JsValue {
    let obj = Object::new();
    set(&obj, "intensity", JsValue::from_f64(command.intensity));
    set(&obj, "cameraId", JsValue::from_str(&command.camera_id));
    if let Some(level) = command.force_level {
        set(&obj, "forceLevel", JsValue::from_f64(level as f64));
    }
    if let Some(burst) = command.burst {
        set(&obj, "burst", JsValue::from_bool(burst));
    }
    if let Some(pwm) = command.use_pwm {
        set(&obj, "usePWM", JsValue::from_bool(pwm));
    }
    obj.into()
}

fn parse_telemetry(v: &JsValue) -> Result<HardwareTelemetry, BridgeError> {
    let cams = get(v, "cameras");
    if !Array::is_array(&cams) {
        return Err(BridgeError::Malformed("cameras missing".into()));
    }
    let cameras = Array::from(&cams)
        .iter()
        .filter_map(|c| {
            Some(CameraInfo {
                id: get_string(&c, "id")?,
                has_flash: get(&c, "hasFlash").as_bool().unwrap_or(false),
                max_level: get(&c, "maxLevel").as_f64().unwrap_or(0.0).max(0.0) as u32,
            })
        })
        .collect();
    Ok(HardwareTelemetry {
        manufacturer: get_string(v, "manufacturer").unwrap_or_default(),
        model: get_string(v, "model").unwrap_or_default(),
        cameras,
        torch_status: get_string(v, "torchStatus").unwrap_or_else(|| "Unknown".into()),
        scan_result: get_string(v, "scanResult").filter(|s| !s.is_empty()),
    })
}

pub struct CapacitorBridge {
    plugin: Option<JsValue>,
}

impl CapacitorBridge {
    pub fn detect() -> Self {
        let plugin = capacitor_plugin(ACTUATOR_PLUGIN);
        if plugin.is_none() {
            log::warn!("[hw] {} plugin not found; running without hardware", ACTUATOR_PLUGIN);
        }
        Self { plugin }
    }

    fn start(&self, method: &str, arg: Option<&JsValue>) -> Result<Promise, BridgeError> {
        let plugin = self.plugin.as_ref().ok_or(BridgeError::Unavailable)?;
        call(plugin, method, arg)
    }
}

impl ActuatorBridge for CapacitorBridge {
    fn set_intensity(&self, command: HardwareCommand) -> BridgeFuture<CommandAck> {
        // the call is issued now; only the response is awaited later
        let pending = self.start("setIntensity", Some(&command_args(&command)));
        let camera_id = command.camera_id;
        Box::pin(async move {
            let v = settle(pending).await?;
            Ok(CommandAck {
                status: get_string(&v, "status").unwrap_or_else(|| "OK".into()),
                id: get_string(&v, "id").unwrap_or(camera_id),
            })
        })
    }

    fn request_permissions(&self) -> BridgeFuture<()> {
        let pending = self.start("requestPermissions", None);
        Box::pin(async move {
            let v = settle(pending).await?;
            match get_string(&v, "camera").as_deref() {
                Some("denied") => Err(BridgeError::PermissionDenied("camera".into())),
                _ => Ok(()),
            }
        })
    }

    fn get_hardware_info(&self) -> BridgeFuture<HardwareTelemetry> {
        let pending = self.start("getFlashHardwareInfo", None);
        Box::pin(async move { parse_telemetry(&settle(pending).await?) })
    }

    fn deep_scan(&self) -> BridgeFuture<String> {
        let pending = self.start("deepScan", None);
        Box::pin(async move {
            let v = settle(pending).await?;
            Ok(get_string(&v, "result").unwrap_or_default())
        })
    }

    fn dump_characteristics(&self, camera_id: &str) -> BridgeFuture<Vec<String>> {
        let args = Object::new();
        set(&args, "cameraId", JsValue::from_str(camera_id));
        let pending = self.start("dumpAllCharacteristics", Some(&args.into()));
        Box::pin(async move {
            let v = settle(pending).await?;
            let data = get(&v, "data");
            if !Array::is_array(&data) {
                return Err(BridgeError::Malformed("data missing".into()));
            }
            Ok(Array::from(&data)
                .iter()
                .filter_map(|l| l.as_string())
                .collect())
        })
    }
}

/// Fire a haptic impact through Capacitor, falling back to `navigator.vibrate`.
pub fn haptic_impact(strength: HapticStrength) {
    if let Some(haptics) = capacitor_plugin(HAPTICS_PLUGIN) {
        let args = Object::new();
        set(&args, "style", JsValue::from_str(strength.style_name()));
        match call(&haptics, "impact", Some(&args.into())) {
            // fire-and-forget; a rejected pulse is not worth surfacing
            Ok(_) => return,
            Err(e) => log::debug!("[tick] haptics plugin failed: {}", e),
        }
    }
    if let Some(window) = web::window() {
        _ = window.navigator().vibrate_with_duration(strength.vibrate_ms());
    }
}

// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::geodesic_integrator::IntegratorSettings;
use crate::core::kerr::{BlackHole, KerrError};
use crate::core::scene::{FeatureFlags, Scene};
use crate::emitters::accretion_disk::DiskSettings;
use crate::emitters::envmap::EnvMap;
use crate::emitters::ergosphere::ErgosphereSettings;
use crate::emitters::jet::JetSettings;
use crate::emitters::photon_ring::PhotonRingSettings;
use crate::emitters::starfield::{Starfield, StarfieldSettings};
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::sensors::perspective::PerspectiveCamera;

#[derive(Debug, thiserror::Error)]
pub enum SceneLoadError {
    #[error("cannot read scene: {0}")]
    Io(#[from] std::io::Error),
    #[error("scene parse error: {0}")]
    Parse(String),
    #[error("missing scene field: {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    InvalidParameter(#[from] KerrError),
}

pub struct SceneLoadResult {
    pub scene: Scene,
    pub integrator_settings: IntegratorSettings,
    pub samples_per_pixel: Option<u32>,
}

pub fn load_scene_with_settings<P: AsRef<Path>>(path: P) -> Result<SceneLoadResult, SceneLoadError> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    log::info!("loading scene {}", path.display());
    parse_scene(&xml, base_dir)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Integrator,
    BlackHole,
    Disk,
    Jets,
    PhotonRing,
    Ergosphere,
    Debug,
    Sensor,
    Emitter,
}

impl Block {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"integrator" => Some(Block::Integrator),
            b"blackhole" => Some(Block::BlackHole),
            b"disk" => Some(Block::Disk),
            b"jets" => Some(Block::Jets),
            b"photon_ring" => Some(Block::PhotonRing),
            b"ergosphere" => Some(Block::Ergosphere),
            b"debug" => Some(Block::Debug),
            b"sensor" => Some(Block::Sensor),
            b"emitter" => Some(Block::Emitter),
            _ => None,
        }
    }

    fn feature(self) -> Option<FeatureFlags> {
        match self {
            Block::Disk => Some(FeatureFlags::DISK),
            Block::Jets => Some(FeatureFlags::JETS),
            Block::PhotonRing => Some(FeatureFlags::PHOTON_RING),
            Block::Ergosphere => Some(FeatureFlags::ERGOSPHERE),
            Block::Debug => Some(FeatureFlags::DEBUG),
            _ => None,
        }
    }
}

/// Named `<float>`, `<integer>`, `<rgb>`... children of the open block.
#[derive(Default)]
struct Params {
    values: HashMap<String, String>,
}

impl Params {
    fn float(&self, name: &str) -> Result<Option<Float>, SceneLoadError> {
        self.values.get(name).map(|v| parse_float(v)).transpose()
    }

    fn float_or(&self, name: &str, default: Float) -> Result<Float, SceneLoadError> {
        Ok(self.float(name)?.unwrap_or(default))
    }

    fn uint(&self, name: &str) -> Result<Option<u64>, SceneLoadError> {
        self.values.get(name).map(|v| parse_u64(v)).transpose()
    }

    fn uint32(&self, name: &str) -> Result<Option<u32>, SceneLoadError> {
        self.uint(name)?
            .map(|v| {
                u32::try_from(v).map_err(|_| SceneLoadError::Parse(format!("{} out of range: {}", name, v)))
            })
            .transpose()
    }

    fn boolean_or(&self, name: &str, default: bool) -> Result<bool, SceneLoadError> {
        match self.values.get(name) {
            Some(v) => parse_bool(v),
            None => Ok(default),
        }
    }

    fn rgb_or(&self, name: &str, default: RGBSpectrum) -> Result<RGBSpectrum, SceneLoadError> {
        match self.values.get(name) {
            Some(v) => {
                let c = parse_vec3(v)?;
                Ok(RGBSpectrum::new(c.x, c.y, c.z))
            }
            None => Ok(default),
        }
    }

    fn string(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }
}

struct OpenBlock {
    block: Block,
    kind: Option<String>,
    id: Option<String>,
    enabled: bool,
    params: Params,
    lookat: Option<(Vector3f, Vector3f, Vector3f)>,
}

struct SceneBuilder<'a> {
    base_dir: &'a Path,
    defaults: HashMap<String, String>,
    scene: Scene,
    settings: IntegratorSettings,
    spp: Option<u32>,
    open: Option<OpenBlock>,
    in_to_world: bool,
}

impl<'a> SceneBuilder<'a> {
    fn new(base_dir: &'a Path) -> Result<Self, SceneLoadError> {
        let scene = Scene::new(BlackHole::new(1.0, 0.0)?);
        Ok(Self {
            base_dir,
            defaults: HashMap::new(),
            scene,
            settings: IntegratorSettings::default(),
            spp: None,
            open: None,
            in_to_world: false,
        })
    }

    fn attributes(&self, e: &BytesStart) -> HashMap<String, String> {
        let mut out = HashMap::new();
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let raw = attr.unescape_value().unwrap_or_default();
            out.insert(key, resolve_value(&raw, &self.defaults));
        }
        out
    }

    fn start(&mut self, e: &BytesStart, is_empty: bool) -> Result<(), SceneLoadError> {
        let tag = e.name();
        let tag = tag.as_ref();
        let attrs = self.attributes(e);

        if tag == b"default" {
            if let (Some(k), Some(v)) = (attrs.get("name"), attrs.get("value")) {
                self.defaults.insert(k.clone(), v.clone());
            }
            return Ok(());
        }

        if let Some(block) = Block::from_tag(tag) {
            if self.open.is_some() {
                return Err(SceneLoadError::Parse(format!(
                    "<{}> cannot be nested", String::from_utf8_lossy(tag))));
            }
            let enabled = match attrs.get("enabled") {
                Some(v) => parse_bool(v)?,
                None => true,
            };
            self.open = Some(OpenBlock {
                block,
                kind: attrs.get("type").cloned(),
                id: attrs.get("id").cloned(),
                enabled,
                params: Params::default(),
                lookat: None,
            });
            if is_empty {
                self.finish_block()?;
            }
            return Ok(());
        }

        match tag {
            b"float" | b"integer" | b"boolean" | b"string" | b"rgb" => {
                let name = attrs.get("name").ok_or(SceneLoadError::MissingField("name"))?;
                let value = attrs.get("value").ok_or(SceneLoadError::MissingField("value"))?;
                match self.open.as_mut() {
                    Some(open) => {
                        open.params.values.insert(name.clone(), value.clone());
                    }
                    None if name == "time" => self.scene.set_time(parse_float(value)?),
                    None => log::warn!("ignoring top-level parameter {}", name),
                }
            }
            b"transform" => {
                self.in_to_world = attrs.get("name").map(|n| n == "to_world").unwrap_or(false);
            }
            b"lookat" => {
                if let Some(open) = self.open.as_mut() {
                    if open.block == Block::Sensor && self.in_to_world {
                        let origin = attrs.get("origin").ok_or(SceneLoadError::MissingField("lookat.origin"))?;
                        let target = attrs.get("target").ok_or(SceneLoadError::MissingField("lookat.target"))?;
                        let up = match attrs.get("up") {
                            Some(up) => parse_vec3(up)?,
                            None => Vector3f::new(0.0, 0.0, 1.0),
                        };
                        open.lookat = Some((parse_vec3(origin)?, parse_vec3(target)?, up));
                    }
                }
            }
            b"scene" | b"film" => {}
            other => log::debug!("ignoring <{}>", String::from_utf8_lossy(other)),
        }
        Ok(())
    }

    fn end(&mut self, tag: &[u8]) -> Result<(), SceneLoadError> {
        if tag == b"transform" {
            self.in_to_world = false;
        } else if let Some(block) = Block::from_tag(tag) {
            if self.open.as_ref().map(|o| o.block) == Some(block) {
                self.finish_block()?;
            }
        }
        Ok(())
    }

    fn finish_block(&mut self) -> Result<(), SceneLoadError> {
        let open = match self.open.take() {
            Some(open) => open,
            None => return Ok(()),
        };
        if let Some(flag) = open.block.feature() {
            self.scene.enable(flag, open.enabled);
        }
        let p = &open.params;

        match open.block {
            Block::Integrator => {
                let kind = open.kind.as_deref().unwrap_or("kerr");
                if kind != "kerr" {
                    return Err(SceneLoadError::Parse(format!("unsupported integrator: {}", kind)));
                }
                if let Some(v) = p.uint32("max_steps")? {
                    self.settings.max_steps = v;
                }
                self.settings.step_size = p.float_or("step_size", self.settings.step_size)?;
                self.settings.escape_radius = p.float_or("escape_radius", self.settings.escape_radius)?;
                if let Some(v) = p.uint32("sample_count")? {
                    self.spp = Some(v);
                }
            }
            Block::BlackHole => {
                let mass = p.float_or("mass", 1.0)?;
                let spin = p.float_or("spin", 0.0)?;
                *self.scene.black_hole_mut() = BlackHole::new(mass, spin)?;
            }
            Block::Disk => {
                let d = DiskSettings::default();
                self.scene.set_disk(DiskSettings {
                    inner_radius: p.float("inner_radius")?.or(d.inner_radius),
                    outer_radius: p.float_or("outer_radius", d.outer_radius)?,
                    temperature_scale: p.float_or("temperature_scale", d.temperature_scale)?,
                    peak_temperature: p.float("peak_temperature")?.or(d.peak_temperature),
                    half_thickness: p.float_or("half_thickness", d.half_thickness)?,
                    opacity: p.float_or("opacity", d.opacity)?,
                    brightness: p.float_or("brightness", d.brightness)?,
                    gravitational_shift: p.boolean_or("gravitational_shift", d.gravitational_shift)?,
                });
            }
            Block::Jets => {
                let d = JetSettings::default();
                self.scene.set_jet(JetSettings {
                    min_spin: p.float_or("min_spin", d.min_spin)?,
                    min_height: p.float_or("min_height", d.min_height)?,
                    length: p.float_or("length", d.length)?,
                    base_radius: p.float_or("base_radius", d.base_radius)?,
                    opening_angle: p.float_or("opening_angle", d.opening_angle)?,
                    bulk_velocity: p.float_or("bulk_velocity", d.bulk_velocity)?,
                    knot_spacing: p.float_or("knot_spacing", d.knot_spacing)?,
                    knot_speed: p.float_or("knot_speed", d.knot_speed)?,
                    brightness: p.float_or("brightness", d.brightness)?,
                    color: p.rgb_or("color", d.color)?,
                });
            }
            Block::PhotonRing => {
                let d = PhotonRingSettings::default();
                self.scene.set_photon_ring(PhotonRingSettings {
                    intensity: p.float_or("intensity", d.intensity)?,
                    color: p.rgb_or("color", d.color)?,
                });
            }
            Block::Ergosphere => {
                let d = ErgosphereSettings::default();
                self.scene.set_ergosphere(ErgosphereSettings {
                    intensity: p.float_or("intensity", d.intensity)?,
                    color: p.rgb_or("color", d.color)?,
                });
            }
            Block::Debug => {}
            Block::Sensor => {
                let kind = open.kind.as_deref().unwrap_or("perspective");
                if kind != "perspective" {
                    return Err(SceneLoadError::Parse(format!("unsupported sensor: {}", kind)));
                }
                let fov_deg = p.float_or("fov", 45.0)?;
                let width = p.uint("width")?.ok_or(SceneLoadError::MissingField("film.width"))? as usize;
                let height = p.uint("height")?.ok_or(SceneLoadError::MissingField("film.height"))? as usize;
                let (origin, target, up) = open.lookat.ok_or(SceneLoadError::MissingField("sensor.lookat"))?;
                if (target - origin).norm() <= 0.0 {
                    return Err(SceneLoadError::Parse("lookat origin equals target".to_string()));
                }
                self.scene.add_sensor(Box::new(PerspectiveCamera::new(
                    origin, target, up, fov_deg.to_radians(), width, height,
                )));
            }
            Block::Emitter => match open.kind.as_deref() {
                Some("starfield") => {
                    let d = StarfieldSettings::default();
                    let settings = StarfieldSettings {
                        density: p.float_or("density", d.density)?,
                        brightness: p.float_or("brightness", d.brightness)?,
                        layers: p.uint32("layers")?.unwrap_or(d.layers),
                        seed: p.uint("seed")?.unwrap_or(d.seed),
                        band_intensity: p.float_or("band_intensity", d.band_intensity)?,
                    };
                    self.scene.set_sky(Box::new(Starfield::with_id(settings, open.id.clone())));
                }
                Some("envmap") => {
                    let filename = p.string("filename").ok_or(SceneLoadError::MissingField("envmap.filename"))?;
                    let path = if Path::new(filename).is_absolute() {
                        filename.to_string()
                    } else {
                        self.base_dir.join(filename).to_string_lossy().to_string()
                    };
                    let mut env = EnvMap::from_file_with_id(&path, p.float_or("scale", 1.0)?, open.id.clone())
                        .map_err(|e| SceneLoadError::Parse(format!("envmap load failed: {}", e)))?;
                    env.set_rotation(p.float_or("rotation", 0.0)?.to_radians());
                    self.scene.set_sky(Box::new(env));
                }
                other => {
                    return Err(SceneLoadError::Parse(format!("unsupported emitter: {}", other.unwrap_or("<none>"))));
                }
            },
        }
        Ok(())
    }
}

pub fn parse_scene(xml: &str, base_dir: &Path) -> Result<SceneLoadResult, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut builder = SceneBuilder::new(base_dir)?;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => builder.start(&e, false)?,
            Ok(Event::Empty(e)) => builder.start(&e, true)?,
            Ok(Event::End(e)) => builder.end(e.name().as_ref())?,
            Err(e) => return Err(SceneLoadError::Parse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    if builder.open.is_some() {
        return Err(SceneLoadError::Parse("unterminated block".to_string()));
    }

    builder.scene.log_summary();
    Ok(SceneLoadResult {
        scene: builder.scene,
        integrator_settings: builder.settings,
        samples_per_pixel: builder.spp,
    })
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    for (k, v) in defaults {
        out = out.replace(&format!("${}", k), v);
    }
    out
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_u64(value: &str) -> Result<u64, SceneLoadError> {
    value.trim().parse::<u64>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_bool(value: &str) -> Result<bool, SceneLoadError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(SceneLoadError::Parse(format!("invalid boolean: {}", other))),
    }
}

fn parse_vec3(value: &str) -> Result<Vector3f, SceneLoadError> {
    let mut parts = value.split(',').map(|s| s.trim()).filter(|s| !s.is_empty());
    let mut next = || parts.next().ok_or_else(|| SceneLoadError::Parse(format!("invalid vec3: {}", value)));
    let (x, y, z) = (next()?, next()?, next()?);
    Ok(Vector3f::new(parse_float(x)?, parse_float(y)?, parse_float(z)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SCENE: &str = r#"
<scene version="3.0.0">
    <default name="spp" value="4"/>
    <default name="res" value="32"/>
    <integrator type="kerr">
        <integer name="max_steps" value="800"/>
        <float name="step_size" value="0.25"/>
        <float name="escape_radius" value="150"/>
        <integer name="sample_count" value="$spp"/>
    </integrator>
    <blackhole>
        <float name="mass" value="1.0"/>
        <float name="spin" value="0.9"/>
    </blackhole>
    <disk enabled="true">
        <float name="outer_radius" value="15"/>
        <float name="half_thickness" value="0.1"/>
    </disk>
    <jets enabled="true">
        <rgb name="color" value="0.5, 0.6, 1.0"/>
    </jets>
    <ergosphere enabled="false"/>
    <debug enabled="true"/>
    <float name="time" value="2.5"/>
    <sensor type="perspective">
        <float name="fov" value="40"/>
        <transform name="to_world">
            <lookat origin="0, -50, 5" target="0, 0, 0" up="0, 0, 1"/>
        </transform>
        <film type="hdrfilm">
            <integer name="width" value="$res"/>
            <integer name="height" value="24"/>
        </film>
    </sensor>
    <emitter type="starfield" id="sky">
        <float name="density" value="0.05"/>
        <integer name="seed" value="11"/>
    </emitter>
</scene>
"#;

    fn parse(xml: &str) -> Result<SceneLoadResult, SceneLoadError> {
        parse_scene(xml, Path::new("."))
    }

    #[test]
    fn test_parse_full_scene() {
        let result = parse(SCENE).unwrap();
        assert_eq!(result.samples_per_pixel, Some(4));
        assert_eq!(result.integrator_settings.max_steps, 800);
        assert_relative_eq!(result.integrator_settings.step_size, 0.25);
        assert_relative_eq!(result.integrator_settings.escape_radius, 150.0);

        let scene = &result.scene;
        assert_relative_eq!(scene.black_hole().spin(), 0.9);
        assert_relative_eq!(scene.disk().outer_radius(), 15.0);
        assert_relative_eq!(scene.disk().settings().half_thickness, 0.1);
        assert_relative_eq!(scene.jet().settings().color[2], 1.0);
        assert_relative_eq!(scene.time(), 2.5);
        assert!(scene.is_enabled(FeatureFlags::DISK));
        assert!(scene.is_enabled(FeatureFlags::JETS));
        assert!(scene.is_enabled(FeatureFlags::DEBUG));
        assert!(!scene.is_enabled(FeatureFlags::ERGOSPHERE));
        // untouched blocks keep their defaults
        assert!(scene.is_enabled(FeatureFlags::PHOTON_RING));

        let camera = scene.camera(0).unwrap();
        assert_eq!(camera.bitmap().width(), 32);
        assert_eq!(camera.bitmap().height(), 24);
        assert!(scene.sky().is_some());
    }

    #[test]
    fn test_defaults_without_integrator() {
        let xml = r#"<scene><sensor type="perspective">
            <transform name="to_world"><lookat origin="0, -20, 0" target="0, 0, 0"/></transform>
            <film><integer name="width" value="8"/><integer name="height" value="8"/></film>
        </sensor></scene>"#;
        let result = parse(xml).unwrap();
        assert_eq!(result.integrator_settings, IntegratorSettings::default());
        assert_eq!(result.samples_per_pixel, None);
        assert!(result.scene.sky().is_none());
        assert!(result.scene.black_hole().is_schwarzschild());
    }

    #[test]
    fn test_overspun_black_hole_is_rejected() {
        let xml = r#"<scene><blackhole><float name="spin" value="1.2"/></blackhole></scene>"#;
        assert!(matches!(parse(xml), Err(SceneLoadError::InvalidParameter(_))));
    }

    #[test]
    fn test_unsupported_integrator() {
        let xml = r#"<scene><integrator type="path"/></scene>"#;
        assert!(matches!(parse(xml), Err(SceneLoadError::Parse(_))));
    }

    #[test]
    fn test_missing_film_width() {
        let xml = r#"<scene><sensor type="perspective">
            <transform name="to_world"><lookat origin="0, -20, 0" target="0, 0, 0"/></transform>
            <film><integer name="height" value="8"/></film>
        </sensor></scene>"#;
        assert!(matches!(parse(xml), Err(SceneLoadError::MissingField("film.width"))));
    }

    #[test]
    fn test_bad_numbers() {
        let xml = r#"<scene><blackhole><float name="mass" value="heavy"/></blackhole></scene>"#;
        assert!(matches!(parse(xml), Err(SceneLoadError::Parse(_))));
        let xml = r#"<scene><disk enabled="maybe"/></scene>"#;
        assert!(matches!(parse(xml), Err(SceneLoadError::Parse(_))));
    }

    #[test]
    fn test_counts_beyond_u32_are_rejected() {
        let xml = r#"<scene><integrator type="kerr"><integer name="max_steps" value="4294967301"/></integrator></scene>"#;
        assert!(matches!(parse(xml), Err(SceneLoadError::Parse(_))));
        let xml = r#"<scene><integrator type="kerr"><integer name="sample_count" value="4294967296"/></integrator></scene>"#;
        assert!(matches!(parse(xml), Err(SceneLoadError::Parse(_))));
        let xml = r#"<scene><integrator type="kerr"><integer name="max_steps" value="4294967295"/></integrator></scene>"#;
        assert_eq!(parse(xml).unwrap().integrator_settings.max_steps, u32::MAX);
    }

    #[test]
    fn test_disk_peak_temperature_and_shift_flag() {
        let xml = r#"<scene>
            <disk>
                <float name="peak_temperature" value="9000"/>
                <boolean name="gravitational_shift" value="true"/>
            </disk>
        </scene>"#;
        let scene = parse(xml).unwrap().scene;
        assert_eq!(scene.disk().settings().peak_temperature, Some(9000.0));
        assert!(scene.disk().settings().gravitational_shift);
        assert_relative_eq!(
            scene.disk().temperature(scene.black_hole(), scene.disk().peak_radius(scene.black_hole())),
            9000.0,
            max_relative = 1e-9
        );
        assert!(!parse("<scene/>").unwrap().scene.disk().settings().gravitational_shift);
    }

    #[test]
    fn test_missing_envmap_file() {
        let xml = r#"<scene><emitter type="envmap"><string name="filename" value="no_such_sky.exr"/></emitter></scene>"#;
        assert!(matches!(parse(xml), Err(SceneLoadError::Parse(_))));
    }
}

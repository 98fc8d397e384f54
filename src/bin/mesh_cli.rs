fn main() {
    env_logger::init();
    if let Err(err) = native::run() {
        eprintln!("mesh_cli error: {err}");
        std::process::exit(1);
    }
}

mod native {
    use aeromesh::{
        Axis, AxisPermutation, Facet, Network, NetworkRole, Point3, RbfKernel, SlabMeshOptions,
        SlabPointSets, Spacing, SurfaceFitOptions, WingMeshOptions, WingPointSets, WingSide,
        cubic_bounds, extract_point_set, mesh_slab, mesh_wing,
    };
    use serde::{Deserialize, Serialize};
    use serde_json::Value;
    use std::f64::consts::PI;
    use std::fmt::Write as _;
    use std::fs;
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"mesh_cli (aeromesh)

USAGE:
  mesh_cli list
  mesh_cli run <scenario|all> [options]

SCENARIOS:
  square_plate
  tapered_wing
  tapered_wing_left
  fuselage_slab

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.snap and/or <scenario>.json to this dir (required for `all`)
  --snap <path>      Write golden-style snapshot (single scenario only)
  --json <path>      Write networks as JSON (single scenario only)
  --config <path>    JSON file with `wing` and/or `slab` option overrides
  --no-snap          Skip snapshot when using --out-dir
  --no-json          Skip JSON when using --out-dir
  --overwrite        Overwrite existing output files
  -h, --help         Show this help

Set RUST_LOG=debug to trace the meshing steps.
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut json_path: Option<PathBuf> = None;
        let mut config_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut write_snap = true;
        let mut write_json = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--json" => json_path = Some(PathBuf::from(args.value("--json")?)),
                "--config" => config_path = Some(PathBuf::from(args.value("--config")?)),
                "--overwrite" => overwrite = true,
                "--no-snap" => write_snap = false,
                "--no-json" => write_json = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let config = match config_path.as_deref() {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        if let Some(dir) = out_dir.as_ref() {
            if snap_path.is_some() || json_path.is_some() {
                return Err("use either --out-dir or --snap/--json (not both)".to_string());
            }
            if !write_snap && !write_json {
                return Err("nothing to write (both --no-snap and --no-json set)".to_string());
            }

            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(
                        *scenario, &config, dir, write_snap, write_json, overwrite,
                    )?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_name(scenario_name.as_str())
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(
                scenario, &config, dir, write_snap, write_json, overwrite,
            );
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario = Scenario::from_name(scenario_name.as_str())
            .ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario, &config)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        if let Some(path) = json_path.as_deref() {
            write_text_file(path, &output.json()?, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}", output.summary());
        Ok(())
    }

    fn run_one_scenario_to_dir(
        scenario: Scenario,
        config: &CliConfig,
        dir: &Path,
        write_snap: bool,
        write_json: bool,
        overwrite: bool,
    ) -> Result<(), String> {
        let output = run_scenario(scenario, config)?;

        if write_snap {
            let path = dir.join(format!("{}.snap", output.name));
            write_text_file(&path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if write_json {
            let path = dir.join(format!("{}.json", output.name));
            write_text_file(&path, &output.json()?, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}", output.summary());
        Ok(())
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = String::new();
        let _ = writeln!(msg, "unknown scenario `{name}`\n\navailable scenarios:");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text))
            .map_err(|e| format!("write {}: {e}", path.display()))
    }

    // ------------------------------------------------------------------
    // Configuration overrides
    // ------------------------------------------------------------------

    /// Partial option objects merged over each scenario's preset.
    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct CliConfig {
        #[serde(default)]
        wing: Option<Value>,
        #[serde(default)]
        slab: Option<Value>,
    }

    impl CliConfig {
        fn load(path: &Path) -> Result<Self, String> {
            let text =
                fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
            serde_json::from_str(&text).map_err(|e| format!("parse {}: {e}", path.display()))
        }

        fn wing(&self, preset: WingMeshOptions) -> Result<WingMeshOptions, String> {
            apply_overrides(preset, self.wing.as_ref())
        }

        fn slab(&self, preset: SlabMeshOptions) -> Result<SlabMeshOptions, String> {
            apply_overrides(preset, self.slab.as_ref())
        }
    }

    fn apply_overrides<T>(preset: T, patch: Option<&Value>) -> Result<T, String>
    where
        T: Serialize + for<'de> Deserialize<'de>,
    {
        let Some(patch) = patch else {
            return Ok(preset);
        };
        let mut merged = serde_json::to_value(&preset).map_err(|e| format!("encode options: {e}"))?;
        merge_json(&mut merged, patch);
        serde_json::from_value(merged).map_err(|e| format!("invalid option override: {e}"))
    }

    /// Object keys in `patch` replace or recurse into `base`; everything else replaces it.
    fn merge_json(base: &mut Value, patch: &Value) {
        match (base, patch) {
            (Value::Object(base), Value::Object(patch)) => {
                for (key, value) in patch {
                    match base.get_mut(key) {
                        Some(slot) => merge_json(slot, value),
                        None => {
                            base.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
            (slot, value) => *slot = value.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let value = if value == -0.0 { 0.0 } else { value };
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == -0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_point_line(out: &mut String, prefix: &str, p: Point3) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, p.x);
        out.push(' ');
        write_f64(out, p.y);
        out.push(' ');
        write_f64(out, p.z);
        out.push('\n');
    }

    fn write_network(out: &mut String, role: NetworkRole, network: &Network) {
        let (stations, rows) = network.shape();
        let _ = writeln!(
            out,
            "network {role} stations {stations} rows {rows} wake {}",
            role.is_wake()
        );
        let _ = writeln!(out, "network.non_finite {}", network.non_finite_count());
        for (index, station) in network.stations.iter().enumerate() {
            let _ = writeln!(out, "s {index} {}", station.len());
            for p in station.points.iter().copied() {
                write_point_line(out, "p", p);
            }
        }
    }

    fn snapshot(op: &str, options: &impl Serialize, networks: &[(NetworkRole, Network)]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# aeromesh golden v1");
        let _ = writeln!(out, "op {op}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        if let Ok(json) = serde_json::to_string(options) {
            let _ = writeln!(out, "options {json}");
        }
        for (role, network) in networks {
            write_network(&mut out, *role, network);
        }
        let refs: Vec<&Network> = networks.iter().map(|(_, n)| n).collect();
        if let Some(bounds) = cubic_bounds(&refs) {
            write_point_line(&mut out, "bounds.min", bounds.min);
            write_point_line(&mut out, "bounds.max", bounds.max);
        } else {
            let _ = writeln!(out, "bounds none");
        }
        normalize_snapshot_text(&out)
    }

    // ------------------------------------------------------------------
    // Scenarios
    // ------------------------------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        SquarePlate,
        TaperedWing,
        TaperedWingLeft,
        FuselageSlab,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::SquarePlate,
            Scenario::TaperedWing,
            Scenario::TaperedWingLeft,
            Scenario::FuselageSlab,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::SquarePlate => "square_plate",
                Scenario::TaperedWing => "tapered_wing",
                Scenario::TaperedWingLeft => "tapered_wing_left",
                Scenario::FuselageSlab => "fuselage_slab",
            }
        }

        fn from_name(name: &str) -> Option<Self> {
            Scenario::ALL.iter().copied().find(|s| s.name() == name)
        }
    }

    #[derive(Serialize)]
    struct NamedNetwork<'a> {
        role: NetworkRole,
        network: &'a Network,
    }

    struct ScenarioOutput {
        name: &'static str,
        networks: Vec<(NetworkRole, Network)>,
        snapshot: String,
    }

    impl ScenarioOutput {
        fn new(
            name: &'static str,
            options: &impl Serialize,
            networks: Vec<(NetworkRole, Network)>,
        ) -> Self {
            let snapshot = snapshot(name, options, &networks);
            Self {
                name,
                networks,
                snapshot,
            }
        }

        fn json(&self) -> Result<String, String> {
            let named: Vec<NamedNetwork<'_>> = self
                .networks
                .iter()
                .map(|(role, network)| NamedNetwork { role: *role, network })
                .collect();
            serde_json::to_string_pretty(&named).map_err(|e| format!("encode json: {e}"))
        }

        fn summary(&self) -> String {
            let mut line = format!("{}:", self.name);
            for (role, network) in &self.networks {
                let (stations, rows) = network.shape();
                let _ = write!(line, " {role}={stations}x{rows}");
                let missing = network.non_finite_count();
                if missing > 0 {
                    let _ = write!(line, "(nan={missing})");
                }
            }
            line
        }
    }

    fn run_scenario(scenario: Scenario, config: &CliConfig) -> Result<ScenarioOutput, String> {
        match scenario {
            Scenario::SquarePlate => scenario_square_plate(config),
            Scenario::TaperedWing => scenario_tapered_wing(config, WingSide::Right),
            Scenario::TaperedWingLeft => scenario_tapered_wing(config, WingSide::Left),
            Scenario::FuselageSlab => scenario_fuselage_slab(config),
        }
    }

    fn wing_output(
        name: &'static str,
        sets: &WingPointSets,
        options: &WingMeshOptions,
    ) -> Result<ScenarioOutput, String> {
        let mesh = mesh_wing(sets, options).map_err(|e| e.to_string())?;
        let networks = mesh
            .networks()
            .into_iter()
            .map(|(role, network)| (role, network.clone()))
            .collect();
        Ok(ScenarioOutput::new(name, options, networks))
    }

    fn scenario_square_plate(config: &CliConfig) -> Result<ScenarioOutput, String> {
        let skin = || grid_facets(2, 2, |u, v| Point3::new(u, 2.0 * v, 0.0));
        let sets = WingPointSets {
            upper: extract(&skin())?,
            lower: extract(&skin())?,
            leading_edge: extract(&line_facets(2, |t| Point3::new(0.0, 2.0 * t, 0.0)))?,
            trailing_edge: extract(&line_facets(2, |t| Point3::new(1.0, 2.0 * t, 0.0)))?,
            upper_junction: extract(&line_facets(2, |t| Point3::new(t, 0.0, 0.0)))?,
            lower_junction: extract(&line_facets(2, |t| Point3::new(t, 0.0, 0.0)))?,
        };
        let preset = WingMeshOptions::default()
            .with_columns(3)
            .with_rows(4)
            .with_wake(10.0, 3);
        wing_output("square_plate", &sets, &config.wing(preset)?)
    }

    fn scenario_tapered_wing(config: &CliConfig, side: WingSide) -> Result<ScenarioOutput, String> {
        let root = 0.5;
        let tip = 4.0;
        let leading = |y: f64| 0.25 * (y - root);
        let trailing = |y: f64| 1.5 - 0.15 * (y - root);
        let span = |t: f64| root + t * (tip - root);
        let section = |s: f64, y: f64, thickness: f64| {
            let chord = trailing(y) - leading(y);
            // NACA-like half thickness, closed at both edges.
            let z = thickness * chord * (PI * s).sin() * (1.0 - 0.3 * s);
            Point3::new(leading(y) + s * chord, y, z)
        };

        let sets = WingPointSets {
            upper: extract(&grid_facets(9, 7, |s, t| section(s, span(t), 0.12)))?,
            lower: extract(&grid_facets(9, 7, |s, t| section(s, span(t), -0.05)))?,
            leading_edge: extract(&line_facets(7, |t| {
                Point3::new(leading(span(t)), span(t), 0.0)
            }))?,
            trailing_edge: extract(&line_facets(7, |t| {
                Point3::new(trailing(span(t)), span(t), 0.0)
            }))?,
            upper_junction: extract(&line_facets(9, |s| section(s, root, 0.12)))?,
            lower_junction: extract(&line_facets(9, |s| section(s, root, -0.05)))?,
        };
        let (name, sets) = match side {
            WingSide::Right => ("tapered_wing", sets),
            WingSide::Left => ("tapered_wing_left", sets.mirrored(Axis::Y)),
        };

        let preset = WingMeshOptions::default()
            .with_columns(8)
            .with_rows(11)
            .with_wake(25.0, 6)
            .with_side(side)
            .with_spacing(Spacing::Cosine, Spacing::Uniform)
            .with_fit(SurfaceFitOptions::radial_basis(RbfKernel::Multiquadric));
        wing_output(name, &sets, &config.wing(preset)?)
    }

    fn scenario_fuselage_slab(config: &CliConfig) -> Result<ScenarioOutput, String> {
        let length = 6.0;
        let radius = |x: f64| 0.15 + 0.5 * (PI * x / length).sin();
        let side = |sign: f64| {
            grid_facets(11, 7, move |u, v| {
                let x = length * u;
                let r = radius(x);
                let y = r * (2.0 * v - 1.0);
                Point3::new(x, y, sign * 0.8 * (r * r - y * y).max(0.0).sqrt())
            })
        };
        let edge = |sign: f64| {
            line_facets(11, move |u| {
                let x = length * u;
                Point3::new(x, sign * radius(x), 0.0)
            })
        };

        let sets = SlabPointSets {
            side1: extract(&side(1.0))?,
            side2: extract(&side(-1.0))?,
            edge1: extract(&edge(-1.0))?,
            edge2: extract(&edge(1.0))?,
        };
        let axes = AxisPermutation::new(Axis::X, Axis::Y, Axis::Z).map_err(|e| e.to_string())?;
        let preset = SlabMeshOptions::default()
            .with_axes(axes)
            .with_columns(9)
            .with_rows(7)
            .with_fit(SurfaceFitOptions::radial_basis(RbfKernel::Multiquadric));
        let options = config.slab(preset)?;

        let network = mesh_slab(&sets, &options).map_err(|e| e.to_string())?;
        Ok(ScenarioOutput::new(
            "fuselage_slab",
            &options,
            vec![(NetworkRole::Slab, network)],
        ))
    }

    fn extract(facets: &[Facet]) -> Result<aeromesh::PointSet, String> {
        extract_point_set(facets).map_err(|e| e.to_string())
    }

    /// Two triangles per cell of an `nu` x `nv` grid over the unit square.
    fn grid_facets(nu: usize, nv: usize, at: impl Fn(f64, f64) -> Point3) -> Vec<Facet> {
        let p = |i: usize, j: usize| at(unit(i, nu), unit(j, nv));
        let mut facets = Vec::new();
        for i in 0..nu - 1 {
            for j in 0..nv - 1 {
                facets.push(Facet::new(p(i, j), p(i + 1, j), p(i + 1, j + 1)));
                facets.push(Facet::new(p(i, j), p(i + 1, j + 1), p(i, j + 1)));
            }
        }
        facets
    }

    /// Sliver triangles along a polyline, the way line exports arrive.
    fn line_facets(samples: usize, at: impl Fn(f64) -> Point3) -> Vec<Facet> {
        (0..samples - 1)
            .map(|i| {
                let a = at(unit(i, samples));
                let b = at(unit(i + 1, samples));
                Facet::new(a, b, b)
            })
            .collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn unit(i: usize, count: usize) -> f64 {
        i as f64 / (count - 1) as f64
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}

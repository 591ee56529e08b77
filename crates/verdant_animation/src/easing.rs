//! Easing functions for tweens

/// Default overshoot for back easing (`back.out` with no argument)
pub const BACK_OVERSHOOT: f32 = 1.70158;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    /// Decelerating cubic ("power2.out")
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    /// Decelerating curve that overshoots the target before settling
    /// ("back.out"); the parameter is the overshoot amount
    EaseOutBack(f32),
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseOutBack(overshoot) => {
                let c1 = *overshoot;
                let c3 = c1 + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u.powi(3) + c1 * u.powi(2)
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }

    /// Parse an easing name as written in config files
    ///
    /// Accepts `linear`/`none`, `power1.*` (quad), `power2.*` (cubic),
    /// `power3.*` (quart), `back.out` with an optional overshoot argument
    /// such as `back.out(1.7)`, and CSS-style `cubic-bezier(x1, y1, x2, y2)`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(rest) = name.strip_prefix("cubic-bezier") {
            let args = rest.trim().strip_prefix('(')?.strip_suffix(')')?;
            let points = args
                .split(',')
                .map(|arg| arg.trim().parse::<f32>().ok())
                .collect::<Option<Vec<_>>>()?;
            return match points[..] {
                // x coordinates must stay within [0, 1] for t to map to a single point
                [x1, y1, x2, y2] if (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2) => {
                    Some(Easing::CubicBezier(x1, y1, x2, y2))
                }
                _ => None,
            };
        }
        if let Some(rest) = name.strip_prefix("back.out") {
            if rest.is_empty() {
                return Some(Easing::EaseOutBack(BACK_OVERSHOOT));
            }
            let arg = rest.strip_prefix('(')?.strip_suffix(')')?;
            return arg.trim().parse().ok().map(Easing::EaseOutBack);
        }

        match name {
            "linear" | "none" => Some(Easing::Linear),
            "power1.in" => Some(Easing::EaseInQuad),
            "power1.out" => Some(Easing::EaseOutQuad),
            "power1.inOut" => Some(Easing::EaseInOutQuad),
            "power2.in" => Some(Easing::EaseInCubic),
            "power2.out" => Some(Easing::EaseOutCubic),
            "power2.inOut" => Some(Easing::EaseInOutCubic),
            "power3.in" => Some(Easing::EaseInQuart),
            "power3.out" => Some(Easing::EaseOutQuart),
            "power3.inOut" => Some(Easing::EaseInOutQuart),
            _ => None,
        }
    }
}

/// Cubic bezier easing calculation (matches CSS / browser implementations).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    // Solve in f64: f32 precision makes the curve jitter visibly near the
    // endpoints of steep curves
    let x = t as f64;
    let x1 = x1 as f64;
    let y1 = y1 as f64;
    let x2 = x2 as f64;
    let y2 = y2 as f64;

    // Newton-Raphson for the parameter whose x matches the input
    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    // Flat slope or no convergence: bisect
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
///
/// Expanded to `((a·t + b)·t + c)·t` (Horner form) with p0 = 0, p3 = 1.
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// dB/dt, from the same coefficients as [`bezier_sample`]
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

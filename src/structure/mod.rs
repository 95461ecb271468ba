// 缠论 구조 엔진
// 포함 관계 처리 -> 분형 -> 필 -> 중추 순서로 구조를 만들고,
// 다이버전스와 상위 타임프레임 리샘플링을 함께 제공합니다.
// 모든 함수는 입력만으로 결과를 다시 계산하며 상태를 보관하지 않습니다.

pub mod center;
pub mod divergence;
pub mod fractal;
pub mod inclusion;
pub mod resample;
pub mod stroke;

pub use center::{Center, CenterSpan, build_centers};
pub use divergence::{DivergenceEvent, DivergenceKind, detect_divergence};
pub use fractal::{Fractal, detect_fractals};
pub use inclusion::{NormalizedBar, normalize};
pub use resample::{ResampledBar, locate, resample};
pub use stroke::{Stroke, build_strokes};

//! The story shipped with the program: bachelor admissions of 2024 across
//! the regions of Ukraine.

use crate::builder::StoryBuilder;
use crate::config::{MapConfig, StoryErrors};
use crate::narrative::Story;

const BLUES: &str = "interpolateBlues";

fn blues(metric: &str, title: &str) -> MapConfig {
    MapConfig::new(metric, BLUES, title)
}

impl Story {
    pub fn builtin() -> Result<Story, StoryErrors> {
        builtin_story()
    }
}

pub fn builtin_story() -> Result<Story, StoryErrors> {
    StoryBuilder::new()
        .chapter(
            "intro",
            "Зарахування бакалаврів по регіонах України 2024",
            "Дослідіть географію зарахування бакалаврів у 25 українських регіонах. \
Цей аналіз показує, куди зараховувалися 185 472 студенти-бакалаври у 2024 році \
та які категорії абітурієнтів обирали заклади вищої освіти в кожному регіоні.",
        )
        .map(blues(
            "Total_Students",
            "Кількість зарахованих бакалаврів по регіонах",
        ))
        // Academic results
        .chapter(
            "score-results",
            "1. Академічна успішність зарахованих",
            "Аналіз академічних показників студентів, які зараховувалися до закладів різних регіонів",
        )
        .map(blues(
            "Average_Score",
            "Академічні показники зарахованих студентів",
        ))
        .section(
            "average-score",
            "Середній бал зарахованих",
            r"### 📊 Середні бали зарахованих по регіонах

**🏆 Найвищий середній бал зарахованих:**
- **Харківська область** — 157,52 балів (заклади регіону мають високі вимоги до вступу)

**📉 Найнижчий середній бал зарахованих:**
- **Кіровоградська область** — 141,8 балів (заклади регіону більш доступні для абітурієнтів з різними балами)

**📏 Різниця між регіонами:**
- **15,72 балів** показує різноманітність освітніх можливостей по країні",
        )?
        .map(blues("Average_Score", "Середній бал зарахованих по регіонах"))
        .section(
            "most-near-perfect",
            "Зарахування високобальників",
            r"### 📊 Розподіл високобальників по регіонах

**🏆 Найбільша кількість за абсолютними числами:**
- **Київ** — понад 1,200 студентів
- **Харків** — 340 студентів
- **Львів** — 280 студентів

**📈 Найкращі пропорції високобальників:**
- **Харківська область** — 4,26%
- **Запорізька область** — 3,8%
- **Дніпропетровська область** — 3,5%

**🇺🇦 Середній показник по Україні:** близько 3,2% від усіх зарахованих

**💡 Особливості:** Великі міста лідирують за кількістю, але менші регіони часто мають кращі пропорції через селективність закладів",
        )?
        .map(blues(
            "Near_Perfect_Count",
            "Кількість зарахованих з майже ідеальними балами",
        ))
        .section(
            "score-spread",
            "Різноманітність зарахованих за балами",
            r"### 📈 Різноманітність балів зарахованих

**📊 Найбільша різноманітність зарахованих:**
- **Донецька область** — 19,9 стандартного відхилення (заклади мають широкий діапазон вимог до вступу)

**🎯 Найбільш однорідні за балами:**
- **Вінницька область** — 14,19 стандартного відхилення (заклади мають схожі вимоги до абітурієнтів)

**💡 Висновок:**
- Це відображає різні освітні стратегії регіонів: від селективних до інклюзивних підходів",
        )?
        .map(blues(
            "Std_Deviation",
            "Різноманітність балів зарахованих студентів",
        ))
        // Age
        .chapter(
            "age-demographics",
            "2. Вікові характеристики зарахованих",
            "Аналіз вікового складу студентів, які зараховувалися до закладів різних регіонів",
        )
        .map(blues("Median_Age", "Віковий склад зарахованих студентів"))
        .section(
            "age-analysis",
            "Віковий склад зарахованих",
            r"### 🎂 Віковий склад зарахованих студентів

**👶 Наймолодший зарахований:**
- **Київ** — 13 років (столичні заклади приймають найталановитіших молодих абітурієнтів)

**👴 Найстарший зарахований:**
- **Запорізька область** — 75 років (регіон відкритий для освіти дорослих)

**📊 Медіанний вік зарахованих:**
- **Найвищий:** Луганська область (26 років) — сюди частіше зараховуються зрілі студенти
- **Найнижчий:** Полтавська область (17 років) — регіон приваблює молодь",
        )?
        .map(blues("Median_Age", "Медіанний вік зарахованих студентів"))
        .section(
            "below-18-percentage",
            "Зарахування молоді до 18 років",
            r"### 👶 Зарахування молоді до 18 років

**📈 Найвища пропорція молоді до 18 років:**
- **Львівська область** — **69,69%** (близько 14,400 молодих студентів)

**📉 Найнижча пропорція молоді:**
- **Херсонська область** — **20,90%** (переважно зрілі абітурієнти)

**🇺🇦 Середній показник по Україні:**
- Близько **50%** зарахованих є неповнолітніми

**🏆 За абсолютними числами:**
- **Київ** лідирує (29,680+ молодих), але пропорційно менше ніж Львів (**64,16%**)",
        )?
        .map(blues(
            "Under_18_Count",
            "Кількість студентів до 18 років по регіонах",
        ))
        .section(
            "above-30-percentage",
            "Зарахування дорослих понад 30 років",
            r"### 👨‍💼 Зарахування дорослих понад 30 років

**📈 Найвища пропорція дорослих понад 30 років:**
- **Луганська область** — **35,65%** (близько 287 дорослих студентів)

**📉 Найнижча пропорція дорослих:**
- **Чернівецька область** — **3,26%** (переважно молоді абітурієнти)

**🇺🇦 Середній показник по Україні:**
- Близько **10-15%** зарахованих є зрілого віку

**🏆 За абсолютними числами:**
- **Київ** лідирує (2,345+ дорослих), але пропорційно менше ніж Луганськ (**5,07%**)",
        )?
        .map(blues(
            "Over_30_Count",
            "Кількість студентів понад 30 років по регіонах",
        ))
        // Gender
        .chapter(
            "gender-analysis",
            "3. Гендерний склад зарахованих",
            "Аналіз гендерного розподілу студентів, які зараховувалися до закладів різних регіонів",
        )
        .map(blues(
            "Gender_Balance_Score",
            "Гендерний склад зарахованих студентів",
        ))
        .section(
            "gender-participation",
            "Зарахування жінок по регіонах",
            r"### 👩‍🎓 Зарахування жінок по регіонах

**📈 Найвища пропорція жінок серед зарахованих:**
- **Закарпатська область** — 60,59% (близько 1,200 жінок)

**📉 Найнижча пропорція жінок:**
- **Херсонська область** — 25,87% (переважно зараховуються чоловіки)

**⚖️ Збалансоване зарахування:**
- **Одеська та Волинська області** — ~50% жінок

**🏆 За абсолютними числами:**
- **Київ** лідирує (17,000+ жінок), але пропорційно менше ніж Закарпаття",
        )?
        .map(blues(
            "Female_Percentage",
            "Відсоток жінок серед зарахованих по регіонах",
        ))
        .section(
            "male-participation",
            "Зарахування чоловіків по регіонах",
            r"### 👨‍🎓 Зарахування чоловіків по регіонах

**📈 Найвища пропорція чоловіків серед зарахованих:**
- **Херсонська область** — 74,13% (близько 850 чоловіків)

**📉 Найнижча пропорція чоловіків:**
- **Закарпатська область** — 39,41% (переважно зараховуються жінки)

**🇺🇦 Середній показник по Україні:**
- Приблизно 45% зарахованих є чоловіками

**🏆 За абсолютними числами:**
- **Київ** лідирує (13,000+ чоловіків), але пропорційно менше ніж Херсон",
        )?
        .map(blues(
            "Male_Percentage",
            "Відсоток чоловіків серед зарахованих по регіонах",
        ))
        .section(
            "gender-performance-gap",
            "Гендерні розриви в балах зарахованих",
            r"### ⚖️ Гендерні розриви в балах зарахованих

**👩‍🎓 Найбільший розрив на користь жінок:**
- **Львівська область** — +6,28 балів (жінки мають значно вищі бали)

**👨‍🎓 Найбільший розрив на користь чоловіків:**
- **Кіровоградська область** — +3,42 балів

**🎯 Найменший гендерний розрив:**
- **Чернігівська область** — 0,01 балів (практично однакові бали)

**📊 Загальна тенденція:**
- У більшості регіонів жінки зараховуються з вищими балами",
        )?
        .map(blues(
            "Gender_Score_Gap",
            "Різниця в балах між жінками та чоловіками (зарахованими)",
        ))
        .build()
}

//! DBpedia queries

use super::Category;

pub const PREFIX: &str = "\
PREFIX dbo: <http://dbpedia.org/ontology/>
PREFIX dbr: <http://dbpedia.org/resource/>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
";

pub fn queries(category: Category) -> &'static [(&'static str, &'static str)] {
    match category {
        Category::Simple => &[
            (
                "Simple - French cities",
                "SELECT ?city ?name
WHERE {
    ?city a dbo:City ;
          dbo:country dbr:France ;
          rdfs:label ?name .
}
LIMIT 100",
            ),
            (
                "Simple - People and birth dates",
                "SELECT ?person ?name ?birthDate
WHERE {
    ?person a dbo:Person ;
            rdfs:label ?name ;
            dbo:birthDate ?birthDate .
}
LIMIT 100",
            ),
        ],
        Category::Join => &[
            (
                "Join - Films and directors",
                "SELECT ?film ?filmName ?director ?directorName
WHERE {
    ?film a dbo:Film ;
          rdfs:label ?filmName ;
          dbo:director ?director .
    ?director rdfs:label ?directorName .
}
LIMIT 100",
            ),
            (
                "Join - Albums and artists",
                "SELECT ?musician ?musicianName ?album ?albumName
WHERE {
    ?album a dbo:Album ;
           rdfs:label ?albumName ;
           dbo:artist ?musician .
    ?musician rdfs:label ?musicianName .
}
LIMIT 100",
            ),
        ],
        Category::Aggregation => &[
            (
                "Aggregation - Films per year",
                "SELECT ?year (COUNT(?film) AS ?films)
WHERE {
    ?film a dbo:Film ;
          dbo:releaseDate ?date .
    BIND(YEAR(?date) AS ?year)
}
GROUP BY ?year
ORDER BY DESC(?year)
LIMIT 50",
            ),
            (
                "Aggregation - Films per director",
                "SELECT ?director (COUNT(?film) AS ?films)
WHERE {
    ?film a dbo:Film ;
          dbo:director ?director .
}
GROUP BY ?director
ORDER BY DESC(?films)
LIMIT 50",
            ),
        ],
        Category::Filter => &[
            (
                "Filter - People born after 1990",
                "SELECT ?person ?birthDate
WHERE {
    ?person a dbo:Person ;
            dbo:birthDate ?birthDate .
    FILTER (YEAR(?birthDate) > 1990)
}
LIMIT 100",
            ),
            (
                "Filter - Large cities",
                "SELECT ?city ?population
WHERE {
    ?city a dbo:City ;
          dbo:populationTotal ?population .
    FILTER (?population > 1000000)
}
LIMIT 100",
            ),
        ],
        Category::Optional => &[
            (
                "OPTIONAL - Films and awards",
                "SELECT ?film ?filmName ?award
WHERE {
    ?film a dbo:Film ;
          rdfs:label ?filmName .
    OPTIONAL { ?film dbo:award ?award . }
}
LIMIT 100",
            ),
            (
                "UNION - French actors or directors",
                "SELECT ?person ?name ?role
WHERE {
    {
        ?person a dbo:Actor ;
                dbo:nationality dbr:France ;
                rdfs:label ?name .
        BIND(\"Actor\" AS ?role)
    }
    UNION
    {
        ?person a dbo:FilmDirector ;
                dbo:nationality dbr:France ;
                rdfs:label ?name .
        BIND(\"Director\" AS ?role)
    }
}
LIMIT 100",
            ),
        ],
        Category::Subquery => &[(
            "Subquery - Most prolific directors",
            "SELECT ?director ?films
WHERE {
    {
        SELECT ?director (COUNT(?film) AS ?films)
        WHERE {
            ?film a dbo:Film ;
                  dbo:director ?director .
        }
        GROUP BY ?director
    }
    FILTER (?films > 10)
}
ORDER BY DESC(?films)
LIMIT 20",
        )],
    }
}
